//! Components used by the world module.
use bevy::prelude::*;

/// Where the player lands after a scene door named `scene` is used.
#[derive(Component, Debug, Clone)]
pub struct SpawnPoint {
    pub scene: String,
}

/// Marker for interactables whose mesh swings open with their door state.
#[derive(Component, Debug, Default)]
pub struct DoorPanel;
