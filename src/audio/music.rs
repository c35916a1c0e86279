//! Zone music state and the system applying audio commands to it.
use bevy::prelude::*;

use super::events::AudioCommand;

const EVENT_PREFIX: &str = "event:/";

/// Ambient music emitter for the current zone.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct ZoneMusic {
    event: Option<String>,
    playing: bool,
    starts: u32,
}

impl ZoneMusic {
    pub fn with_event(event: impl Into<String>) -> Self {
        Self {
            event: Some(event.into()),
            ..Default::default()
        }
    }

    pub fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Number of times the emitter has been (re)started.
    pub fn starts(&self) -> u32 {
        self.starts
    }

    pub fn play(&mut self) {
        self.playing = true;
        self.starts = self.starts.saturating_add(1);
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Rebinds the emitter to `event:/<track>` and starts it.
    pub fn change(&mut self, track: &str) {
        self.event = Some(format!("{EVENT_PREFIX}{track}"));
        self.play();
    }
}

pub fn apply_audio_commands(
    mut commands: MessageReader<AudioCommand>,
    mut music: ResMut<ZoneMusic>,
) {
    for command in commands.read() {
        match command {
            AudioCommand::PlayCue(cue) => {
                trace!(target: "audio", "Cue {cue}");
            }
            AudioCommand::PlayZoneMusic => {
                music.play();
                debug!(target: "audio", "Started zone music {:?}", music.event());
            }
            AudioCommand::StopZoneMusic => {
                music.stop();
                debug!(target: "audio", "Stopped zone music");
            }
            AudioCommand::ChangeZoneMusic(track) => {
                music.change(track);
                debug!(target: "audio", "Changed zone music to {:?}", music.event());
            }
        }
    }
}
