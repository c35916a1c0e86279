//! Messages emitted by the interaction systems.
use bevy::prelude::*;

/// Interact should run on `entity` this frame.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionTriggered {
    pub entity: Entity,
}

/// A scene door was used.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct SceneLoadRequested {
    pub scene: String,
    /// Persist progression before leaving.
    pub save_on_use: bool,
}
