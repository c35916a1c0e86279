//! Compiled story documents and the library that loads them from disk.
use std::{
    collections::HashMap,
    fmt, fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::config::{DialogueSettings, NarrativeSettings};

/// One advance of a story: the text to reveal plus its tag tokens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Segment {
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Segment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Source of story content consumed by a playback session.
pub trait StorySource: Send + Sync {
    fn has_more(&self) -> bool;

    /// Returns the next segment. Only called while `has_more` is true.
    fn advance(&mut self) -> Option<Segment>;
}

#[derive(Debug, Deserialize)]
struct CompiledStory {
    segments: Vec<Segment>,
}

/// Immutable compiled story with its own read cursor.
///
/// Clones share the segment list, so handing a fresh cursor to every
/// session is cheap.
#[derive(Debug, Clone)]
pub struct StoryDocument {
    segments: Arc<[Segment]>,
    cursor: usize,
}

impl StoryDocument {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments: segments.into(),
            cursor: 0,
        }
    }

    pub fn from_json_str(data: &str) -> Result<Self, StoryLoadError> {
        let compiled: CompiledStory = serde_json::from_str(data)?;
        Ok(Self::new(compiled.segments))
    }

    pub fn load(path: &Path) -> Result<Self, StoryLoadError> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Copy of this document rewound to the first segment.
    pub fn rewound(&self) -> Self {
        Self {
            segments: Arc::clone(&self.segments),
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl StorySource for StoryDocument {
    fn has_more(&self) -> bool {
        self.cursor < self.segments.len()
    }

    fn advance(&mut self) -> Option<Segment> {
        let segment = self.segments.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(segment)
    }
}

#[derive(Debug)]
pub enum StoryLoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for StoryLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(error) => write!(f, "failed to read story: {error}"),
            Self::Json(error) => write!(f, "failed to parse story JSON: {error}"),
        }
    }
}

impl std::error::Error for StoryLoadError {}

impl From<std::io::Error> for StoryLoadError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoryLoadError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Cache of compiled stories keyed by file name under the story directory.
#[derive(Resource, Debug)]
pub struct StoryLibrary {
    root: PathBuf,
    documents: HashMap<String, StoryDocument>,
}

impl StoryLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            documents: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, document: StoryDocument) {
        self.documents.insert(name.into(), document);
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns a rewound document, reading and caching it on first use.
    pub fn open(&mut self, name: &str) -> Result<StoryDocument, StoryLoadError> {
        if let Some(document) = self.documents.get(name) {
            return Ok(document.rewound());
        }

        let document = StoryDocument::load(&self.root.join(name))?;
        debug!(
            target: "dialogue",
            "Loaded story {name} ({} segments)",
            document.len()
        );
        let opened = document.rewound();
        self.documents.insert(name.to_string(), document);
        Ok(opened)
    }
}

impl FromWorld for StoryLibrary {
    fn from_world(world: &mut World) -> Self {
        let root = world
            .get_resource::<NarrativeSettings>()
            .map(|settings| settings.dialogue.story_dir.clone())
            .unwrap_or_else(|| DialogueSettings::default().story_dir);
        Self::new(root)
    }
}
