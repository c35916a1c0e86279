//! Dialogue module - story documents, tag commands, and the reveal state machine.
pub mod errors;
pub mod events;
pub mod playback;
pub mod plugin;
pub mod session;
pub mod story;
pub mod systems;
pub mod tags;
pub mod transcript;

pub use plugin::DialoguePlugin;
