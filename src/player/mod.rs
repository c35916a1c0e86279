//! Player module - input edges, first-person camera and movement gating.

pub mod components;
pub mod events;
pub mod plugin;
pub mod systems;

pub use plugin::PlayerPlugin;
