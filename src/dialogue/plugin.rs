//! Dialogue plugin wiring the session resources and playback systems.
use bevy::prelude::*;

use super::{
    events::DialogueStartRequested,
    session::ActiveDialogue,
    story::StoryLibrary,
    systems::{advance_active_dialogue, handle_movement_skip, start_requested_dialogues},
    transcript::{flush_dialogue_transcript, DialogueTranscript},
};
use crate::interaction::systems::resolve_interactions;

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StoryLibrary>()
            .init_resource::<DialogueTranscript>()
            .init_resource::<ActiveDialogue>()
            .add_message::<DialogueStartRequested>()
            .add_systems(Startup, log_story_root)
            .add_systems(
                Update,
                (
                    start_requested_dialogues,
                    handle_movement_skip,
                    advance_active_dialogue,
                )
                    .chain()
                    .after(resolve_interactions),
            )
            .add_systems(Last, flush_dialogue_transcript);
    }
}

fn log_story_root(library: Res<StoryLibrary>) {
    info!(
        "DialoguePlugin initialised with stories from {}",
        library.root().display()
    );
}
