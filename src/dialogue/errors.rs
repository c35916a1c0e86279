//! Error types surfaced by the dialogue session lifecycle.
use std::fmt;

use super::story::StoryLoadError;

#[derive(Debug)]
pub enum DialogueError {
    /// `init` was called while another session is still active.
    SessionAlreadyActive,
    StoryUnavailable {
        story: String,
        source: StoryLoadError,
    },
}

impl DialogueError {
    pub fn story_unavailable(story: impl Into<String>, source: StoryLoadError) -> Self {
        Self::StoryUnavailable {
            story: story.into(),
            source,
        }
    }
}

impl fmt::Display for DialogueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionAlreadyActive => {
                write!(f, "a dialogue session is already active; interrupt it first")
            }
            Self::StoryUnavailable { story, source } => {
                write!(f, "story {story} unavailable: {source}")
            }
        }
    }
}

impl std::error::Error for DialogueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SessionAlreadyActive => None,
            Self::StoryUnavailable { source, .. } => Some(source),
        }
    }
}
