//! Audio plugin wiring the command message and zone music resource.
use bevy::prelude::*;

use super::{
    events::AudioCommand,
    music::{apply_audio_commands, ZoneMusic},
};

const DEFAULT_ZONE_MUSIC: &str = "event:/Music/Ambience";

pub struct AudioServicePlugin;

impl Plugin for AudioServicePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ZoneMusic::with_event(DEFAULT_ZONE_MUSIC))
            .add_message::<AudioCommand>()
            .add_systems(PostUpdate, apply_audio_commands);
    }
}
