//! World module housing the demo environment and scene transitions.
pub mod components;
pub mod plugin;
pub mod scenes;
pub mod systems;

pub use plugin::WorldPlugin;
