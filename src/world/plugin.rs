//! WorldPlugin sets up the demo grounds and handles scene door transitions.
use bevy::prelude::*;

use crate::{
    dialogue::systems::advance_active_dialogue,
    interaction::systems::resolve_interactions,
    world::{
        scenes::{finish_scene_transition, handle_scene_load_requests, SceneTransition},
        systems::{spawn_demo_interactables, spawn_world_environment, sync_door_panels},
    },
};

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        let transition = SceneTransition::default();
        info!(
            "World scene fade {:.2}s, progression snapshots at {}",
            transition.fade.as_secs_f32(),
            transition.snapshot_path.display()
        );

        app.insert_resource(transition)
            .add_systems(
                Startup,
                (spawn_world_environment, spawn_demo_interactables),
            )
            .add_systems(
                Update,
                (
                    sync_door_panels.after(resolve_interactions),
                    (handle_scene_load_requests, finish_scene_transition)
                        .chain()
                        .after(advance_active_dialogue)
                        .after(resolve_interactions),
                ),
            );
    }
}
