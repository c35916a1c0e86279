//! Components and resources describing the player and its control state.
use bevy::prelude::*;

/// Marker component identifying the player entity (attached to the camera).
#[derive(Component, Debug)]
pub struct Player;

/// First-person look and walk state for the player camera.
#[derive(Component, Debug)]
pub struct FirstPersonCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub move_speed: f32,
    pub look_sensitivity: f32,
}

impl FirstPersonCamera {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch,
            move_speed: 4.0,
            look_sensitivity: 0.2,
        }
    }
}

/// Whether the player may currently walk and look around.
///
/// Interaction enablement lives on `InteractionRegistry`.
#[derive(Resource, Debug, Default)]
pub struct PlayerControl {
    movement_disabled: bool,
}

impl PlayerControl {
    pub fn movement_enabled(&self) -> bool {
        !self.movement_disabled
    }

    pub fn enable_movement(&mut self) {
        if self.movement_disabled {
            debug!(target: "interaction", "Enable movement");
        }
        self.movement_disabled = false;
    }

    pub fn disable_movement(&mut self) {
        if !self.movement_disabled {
            debug!(target: "interaction", "Disable movement");
        }
        self.movement_disabled = true;
    }
}
