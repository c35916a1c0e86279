//! Requests sent to the audio service.
use bevy::prelude::Message;

/// One-shot cues and zone-music control consumed by the audio backend.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum AudioCommand {
    PlayCue(String),
    PlayZoneMusic,
    StopZoneMusic,
    ChangeZoneMusic(String),
}
