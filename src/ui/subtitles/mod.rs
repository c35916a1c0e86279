// src/ui/subtitles/mod.rs
//
// Subtitle surface showing revealed dialogue text.

pub mod components;
pub mod plugin;
pub mod systems;

pub use components::Subtitles;
pub use plugin::SubtitlePlugin;
