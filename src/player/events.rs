//! Input edges raised by the player.
use bevy::prelude::Message;

/// The interact button was pressed this frame.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct InteractPressed;

/// A movement or jump key was pressed this frame.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct MovementPressed;
