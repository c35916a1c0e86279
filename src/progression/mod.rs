//! Progression module: the flag store read by doors and written by story tags.
pub mod plugin;
pub mod state;

pub use plugin::ProgressionPlugin;
