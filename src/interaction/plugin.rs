//! InteractionPlugin wires the targeter systems.
use bevy::prelude::*;

use crate::interaction::{
    events::{InteractionTriggered, SceneLoadRequested},
    registry::InteractionRegistry,
    systems::{
        apply_enablement_changes, forget_despawned, resolve_interactions, route_interact_input,
        track_proximity, update_aim,
    },
};
use crate::player::systems::read_player_input;

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InteractionRegistry>()
            .add_message::<InteractionTriggered>()
            .add_message::<SceneLoadRequested>()
            .add_systems(
                Update,
                (
                    apply_enablement_changes,
                    forget_despawned,
                    track_proximity,
                    update_aim,
                    route_interact_input,
                    resolve_interactions,
                )
                    .chain()
                    .after(read_player_input),
            );
    }
}
