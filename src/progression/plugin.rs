//! Progression plugin seeding the flag store for a new game.
use bevy::prelude::*;

use super::state::ProgressionState;

pub struct ProgressionPlugin;

impl Plugin for ProgressionPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ProgressionState::new_game(false))
            .add_systems(Startup, log_progression);
    }
}

fn log_progression(progression: Res<ProgressionState>) {
    info!(
        "ProgressionPlugin initialised with {} arbitrary keys",
        progression.arbitrary_keys().len()
    );
}
