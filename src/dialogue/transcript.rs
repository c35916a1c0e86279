//! Transcript of dialogue sessions for the in-game log and offline review.
use std::{
    collections::VecDeque,
    fs::{create_dir_all, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use bevy::{log::warn, prelude::*};
use serde::Serialize;

use crate::core::config::NarrativeSettings;

/// Rolling log of session lifecycle records.
#[derive(Resource, Debug)]
pub struct DialogueTranscript {
    capacity: usize,
    records: VecDeque<TranscriptRecord>,
    log: TranscriptLog,
}

impl DialogueTranscript {
    pub fn new(capacity: usize, log_path: impl Into<PathBuf>) -> Self {
        Self {
            capacity: capacity.max(1),
            records: VecDeque::new(),
            log: TranscriptLog::new(log_path),
        }
    }

    pub fn from_settings(settings: &NarrativeSettings) -> Self {
        Self::new(
            settings.transcript.capacity,
            settings.transcript.log_path.clone(),
        )
    }

    pub fn push(&mut self, occurred_at_seconds: f64, entry: TranscriptEntry) {
        let record = TranscriptRecord {
            occurred_at_seconds,
            entry,
        };
        self.log.push(&record);
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn records(&self) -> impl Iterator<Item = &TranscriptRecord> {
        self.records.iter()
    }
}

impl FromWorld for DialogueTranscript {
    fn from_world(world: &mut World) -> Self {
        match world.get_resource::<NarrativeSettings>() {
            Some(settings) => Self::from_settings(settings),
            None => Self::from_settings(&NarrativeSettings::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptRecord {
    pub occurred_at_seconds: f64,
    #[serde(flatten)]
    pub entry: TranscriptEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum TranscriptEntry {
    SessionStarted { story: String },
    SegmentShown { text: String, tags: Vec<String> },
    SessionEnded { story: String },
    SessionInterrupted { story: String },
}

/// Pending records waiting to be appended to the JSON-lines file.
#[derive(Debug)]
struct TranscriptLog {
    output_path: PathBuf,
    pending: Vec<TranscriptRecord>,
}

impl TranscriptLog {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: path.into(),
            pending: Vec::new(),
        }
    }

    fn push(&mut self, record: &TranscriptRecord) {
        self.pending.push(record.clone());
    }

    fn ensure_directory(&self) -> std::io::Result<()> {
        if let Some(parent) = self.output_path.parent() {
            create_dir_all(parent)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        self.ensure_directory()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)?;

        for record in std::mem::take(&mut self.pending) {
            serde_json::to_writer(&mut file, &record)?;
            file.write_all(b"\n")?;
        }

        file.flush()?;
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.output_path
    }
}

/// Appends pending transcript records to disk, warning if persistence fails.
pub fn flush_dialogue_transcript(mut transcript: ResMut<DialogueTranscript>) {
    if transcript.log.pending.is_empty() {
        return;
    }
    if let Err(err) = transcript.log.flush() {
        warn!(
            "Failed to persist dialogue transcript to {:?}: {}",
            transcript.log.path(),
            err
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_the_newest_records() {
        let mut transcript = DialogueTranscript::new(2, "unused.jsonl");
        for story in ["a", "b", "c"] {
            transcript.push(
                0.0,
                TranscriptEntry::SessionStarted {
                    story: story.into(),
                },
            );
        }

        let stories: Vec<_> = transcript
            .records()
            .map(|record| match &record.entry {
                TranscriptEntry::SessionStarted { story } => story.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(stories, ["b", "c"]);
        assert_eq!(transcript.log.pending.len(), 3);
    }

    #[test]
    fn records_serialize_with_event_type() {
        let record = TranscriptRecord {
            occurred_at_seconds: 1.5,
            entry: TranscriptEntry::SegmentShown {
                text: "Hello.".into(),
                tags: vec!["play_music".into()],
            },
        };

        let json = serde_json::to_value(&record).expect("record serializes");
        assert_eq!(json["event_type"], "segment_shown");
        assert_eq!(json["text"], "Hello.");
        assert_eq!(json["occurred_at_seconds"], 1.5);
    }
}
