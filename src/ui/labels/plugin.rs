// src/ui/labels/plugin.rs
//
// Plugin registration for interactable labels and the interaction prompt.

use bevy::prelude::*;

use super::components::{LabelSettings, LabelTracker};
use super::systems::{
    setup_label_root, spawn_floating_labels, update_floating_labels, update_interaction_prompt,
};

/// Shows each interactable's label above it while the label is visible and
/// outlines it while highlighted.
///
/// Requires the player camera (`Player` + `Camera3d`) for projection.
pub struct LabelPlugin;

impl Plugin for LabelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LabelSettings>()
            .init_resource::<LabelTracker>()
            .add_systems(Startup, setup_label_root)
            .add_systems(
                PostUpdate,
                (
                    spawn_floating_labels,
                    update_floating_labels.after(spawn_floating_labels),
                    update_interaction_prompt,
                ),
            );

        info!("LabelPlugin registered");
    }
}
