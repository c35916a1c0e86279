//! Core module hosting the narrative clock and runtime settings.
pub mod config;
pub mod plugin;

pub use plugin::CorePlugin;
