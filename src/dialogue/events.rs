//! Messages that start dialogue sessions.
use bevy::prelude::Message;

use super::session::SessionOptions;

/// Asks the dialogue runner to play `options.story`, interrupting any
/// session that is still active.
#[derive(Message, Debug, Clone)]
pub struct DialogueStartRequested {
    pub options: SessionOptions,
}
