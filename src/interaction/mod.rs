//! Interaction module - eligible set, forward probe, highlight, and interact routing.

pub mod components;
pub mod events;
pub mod plugin;
pub mod probe;
pub mod registry;
pub mod systems;

pub use plugin::InteractionPlugin;
