// src/ui/labels/mod.rs
//
// Floating interactable labels and the interaction prompt.

pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::LabelPlugin;
