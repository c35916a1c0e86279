//! Narrative runtime tuning loaded from `config/narrative.toml`.
use std::{fs, path::Path, path::PathBuf, time::Duration};

use bevy::prelude::*;
use serde::Deserialize;

const CONFIG_PATH: &str = "config/narrative.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawNarrativeConfig {
    #[serde(default)]
    dialogue: RawDialogueSection,
    #[serde(default)]
    interaction: RawInteractionSection,
    #[serde(default)]
    transcript: RawTranscriptSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawDialogueSection {
    text_speed_secs: f32,
    punctuation_pause_multiplier: u32,
    cue_frequency: u32,
    pause_characters: String,
    default_sound: String,
    default_font: String,
    default_text_color: [f32; 3],
    story_dir: String,
}

impl Default for RawDialogueSection {
    fn default() -> Self {
        Self {
            text_speed_secs: 0.04,
            punctuation_pause_multiplier: 10,
            cue_frequency: 3,
            pause_characters: ".,!?".to_string(),
            default_sound: "event:/SFX/DialogueScroll".to_string(),
            default_font: String::new(),
            default_text_color: [1.0, 1.0, 1.0],
            story_dir: "assets/stories".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawInteractionSection {
    probe_max_distance: f32,
    player_capsule_radius: f32,
    player_capsule_height: f32,
    highlight_outline_width: f32,
}

impl Default for RawInteractionSection {
    fn default() -> Self {
        Self {
            probe_max_distance: 8.0,
            player_capsule_radius: 0.5,
            player_capsule_height: 2.0,
            highlight_outline_width: 0.2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawTranscriptSection {
    log_path: String,
    capacity: usize,
}

impl Default for RawTranscriptSection {
    fn default() -> Self {
        Self {
            log_path: "logs/dialogue_history.jsonl".to_string(),
            capacity: 64,
        }
    }
}

/// Reveal cadence and presentation fallbacks for dialogue sessions.
#[derive(Debug, Clone)]
pub struct DialogueSettings {
    pub text_speed: Duration,
    pub punctuation_pause_multiplier: u32,
    pub cue_frequency: u32,
    pub pause_characters: String,
    pub default_sound: String,
    /// Font asset path; empty selects Bevy's built-in font.
    pub default_font: String,
    pub default_text_color: Color,
    pub story_dir: PathBuf,
}

impl DialogueSettings {
    /// Pause applied after a sentence-terminal character.
    pub fn punctuation_pause(&self) -> Duration {
        self.text_speed
            .checked_mul(self.punctuation_pause_multiplier)
            .unwrap_or(Duration::MAX)
    }

    pub fn is_pause_character(&self, character: char) -> bool {
        self.pause_characters.contains(character)
    }
}

impl Default for DialogueSettings {
    fn default() -> Self {
        RawDialogueSection::default().into()
    }
}

/// Probe and proximity geometry for the interaction targeter.
#[derive(Debug, Clone)]
pub struct InteractionSettings {
    pub probe_max_distance: f32,
    pub player_capsule_radius: f32,
    pub player_capsule_height: f32,
    pub highlight_outline_width: f32,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        RawInteractionSection::default().into()
    }
}

#[derive(Debug, Clone)]
pub struct TranscriptSettings {
    pub log_path: PathBuf,
    pub capacity: usize,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        RawTranscriptSection::default().into()
    }
}

/// Validated runtime settings shared by the interaction and dialogue modules.
#[derive(Resource, Debug, Clone, Default)]
pub struct NarrativeSettings {
    pub dialogue: DialogueSettings,
    pub interaction: InteractionSettings,
    pub transcript: TranscriptSettings,
}

impl NarrativeSettings {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(data) => Self::from_toml_str(&data).unwrap_or_else(|err| {
                warn!(
                    "Failed to parse {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                Self::default()
            }),
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                Self::default()
            }
        }
    }

    pub fn from_toml_str(data: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawNarrativeConfig>(data).map(Into::into)
    }
}

impl From<RawNarrativeConfig> for NarrativeSettings {
    fn from(value: RawNarrativeConfig) -> Self {
        Self {
            dialogue: value.dialogue.into(),
            interaction: value.interaction.into(),
            transcript: value.transcript.into(),
        }
    }
}

impl From<RawDialogueSection> for DialogueSettings {
    fn from(value: RawDialogueSection) -> Self {
        let seconds = value.text_speed_secs;
        let seconds = if seconds < 0.0 { 0.0 } else { seconds };
        let text_speed = Duration::try_from_secs_f32(seconds).unwrap_or_else(|err| {
            warn!(
                "Invalid text_speed_secs {} ({}). Falling back to 0.04s.",
                value.text_speed_secs, err
            );
            Duration::from_millis(40)
        });
        let [r, g, b] = value.default_text_color;

        Self {
            text_speed,
            punctuation_pause_multiplier: value.punctuation_pause_multiplier.max(1),
            cue_frequency: value.cue_frequency.max(1),
            pause_characters: value.pause_characters,
            default_sound: value.default_sound,
            default_font: value.default_font,
            default_text_color: Color::srgb(r, g, b),
            story_dir: PathBuf::from(value.story_dir),
        }
    }
}

impl From<RawInteractionSection> for InteractionSettings {
    fn from(value: RawInteractionSection) -> Self {
        Self {
            probe_max_distance: value.probe_max_distance.max(0.0),
            player_capsule_radius: value.player_capsule_radius.max(0.0),
            player_capsule_height: value.player_capsule_height.max(0.0),
            highlight_outline_width: value.highlight_outline_width.max(0.0),
        }
    }
}

impl From<RawTranscriptSection> for TranscriptSettings {
    fn from(value: RawTranscriptSection) -> Self {
        Self {
            log_path: PathBuf::from(value.log_path),
            capacity: value.capacity.max(1),
        }
    }
}
