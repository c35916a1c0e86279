//! The single active dialogue session and its lifecycle operations.
use std::time::Duration;

use bevy::prelude::*;

use crate::{core::config::DialogueSettings, progression::state::SaveKey};

use super::{
    errors::DialogueError,
    playback::{DialogueHost, DialoguePlayback, PlaybackState},
    story::StorySource,
};

/// Resolved font, colour and cue for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub font: String,
    pub color: Color,
    pub cue: String,
}

/// Post-dialogue effects run when a session ends naturally.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionAction {
    DisableInteractable(Entity),
    DespawnInteractable(Entity),
    SetLabelActive { entity: Entity, active: bool },
    DefineKey(SaveKey),
    DefineArbitraryKey(String),
    LoadScene(String),
}

/// Caller-supplied session parameters. Unset presentation values fall back
/// to `DialogueSettings`.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub story: String,
    pub skippable: bool,
    pub auto_play: bool,
    pub auto_play_delay: Duration,
    pub sound: Option<String>,
    pub font: Option<String>,
    pub color: Option<Color>,
    pub source: Option<Entity>,
    pub completion: Vec<CompletionAction>,
}

pub struct DialogueSession {
    playback: DialoguePlayback,
    presentation: Presentation,
    story: String,
    skippable: bool,
    auto_play: bool,
    source: Option<Entity>,
    completion: Vec<CompletionAction>,
}

impl DialogueSession {
    pub fn story(&self) -> &str {
        &self.story
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn is_skippable(&self) -> bool {
        self.skippable
    }

    pub fn auto_play(&self) -> bool {
        self.auto_play
    }

    pub fn state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn set_completion_actions(&mut self, actions: Vec<CompletionAction>) {
        self.completion = actions;
    }
}

/// What the caller must apply after `ActiveDialogue::end`.
#[derive(Debug, Clone, PartialEq)]
pub struct EndedSession {
    pub story: String,
    pub source: Option<Entity>,
    pub auto_play: bool,
    pub completion: Vec<CompletionAction>,
}

/// Holds at most one dialogue session for the player.
///
/// Only `init`, `end` and `interrupt` change whether a session is active.
#[derive(Resource, Default)]
pub struct ActiveDialogue {
    session: Option<DialogueSession>,
    started_this_frame: bool,
}

impl ActiveDialogue {
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DialogueSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut DialogueSession> {
        self.session.as_mut()
    }

    /// Clears the scrolling flag of the active session, if any.
    pub fn request_skip(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.playback.request_skip();
                true
            }
            None => false,
        }
    }

    /// Binds `story`, shows the subtitle surface and reveals up to the first
    /// suspension point.
    pub fn init(
        &mut self,
        story: Box<dyn StorySource>,
        options: SessionOptions,
        settings: &DialogueSettings,
        host: &mut impl DialogueHost,
    ) -> Result<(), DialogueError> {
        if self.is_active() {
            return Err(DialogueError::SessionAlreadyActive);
        }

        let presentation = Presentation {
            font: options
                .font
                .unwrap_or_else(|| settings.default_font.clone()),
            color: options.color.unwrap_or(settings.default_text_color),
            cue: options
                .sound
                .unwrap_or_else(|| settings.default_sound.clone()),
        };
        host.show_surface(&presentation);

        let playback = DialoguePlayback::new(
            story,
            settings.clone(),
            presentation.cue.clone(),
            options.auto_play.then_some(options.auto_play_delay),
        );
        let mut session = DialogueSession {
            playback,
            presentation,
            story: options.story,
            skippable: options.skippable,
            auto_play: options.auto_play,
            source: options.source,
            completion: options.completion,
        };
        session.playback.tick(Duration::ZERO, host);
        self.session = Some(session);
        self.started_this_frame = true;
        Ok(())
    }

    /// True once after `init`: the first character already went out this
    /// frame, so the frame's delta must not be spent on the new session.
    pub fn take_started_this_frame(&mut self) -> bool {
        std::mem::take(&mut self.started_this_frame)
    }

    /// Advances the active session; ends it once playback finishes.
    pub fn tick(&mut self, delta: Duration, host: &mut impl DialogueHost) -> Option<EndedSession> {
        let session = self.session.as_mut()?;
        if session.playback.tick(delta, host) == PlaybackState::Finished {
            self.end(host)
        } else {
            None
        }
    }

    /// Natural completion: hides the surface, clears the session and hands
    /// back its completion actions.
    pub fn end(&mut self, host: &mut impl DialogueHost) -> Option<EndedSession> {
        let session = self.session.take()?;
        self.started_this_frame = false;
        host.hide_surface();
        Some(EndedSession {
            story: session.story,
            source: session.source,
            auto_play: session.auto_play,
            completion: session.completion,
        })
    }

    /// Abandons the active session without running its completion actions.
    pub fn interrupt(&mut self, host: &mut impl DialogueHost) -> Option<String> {
        let session = self.session.take()?;
        self.started_this_frame = false;
        host.hide_surface();
        Some(session.story)
    }
}
