//! Audio module: cue/music requests and the zone music emitter state.
pub mod events;
pub mod music;
pub mod plugin;

pub use plugin::AudioServicePlugin;
