//! Progression flags consulted by doors and set by story tags.
use std::{
    collections::HashSet,
    fmt,
    fs::{self, File},
    io::{self, BufWriter},
    path::Path,
    str::FromStr,
};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Well-known progression keys referenced by name from story tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaveKey {
    None,
    GameStarted,
    CellarKey,
    GreenhouseKey,
    LanternLit,
    MetCaretaker,
}

impl SaveKey {
    pub const ALL: [SaveKey; 6] = [
        SaveKey::None,
        SaveKey::GameStarted,
        SaveKey::CellarKey,
        SaveKey::GreenhouseKey,
        SaveKey::LanternLit,
        SaveKey::MetCaretaker,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SaveKey::None => "NONE",
            SaveKey::GameStarted => "GAME_STARTED",
            SaveKey::CellarKey => "CELLAR_KEY",
            SaveKey::GreenhouseKey => "GREENHOUSE_KEY",
            SaveKey::LanternLit => "LANTERN_LIT",
            SaveKey::MetCaretaker => "MET_CARETAKER",
        }
    }
}

impl fmt::Display for SaveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raised when a story names a key outside the well-known set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSaveKey(pub String);

impl fmt::Display for UnknownSaveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown save key '{}'", self.0)
    }
}

impl std::error::Error for UnknownSaveKey {}

impl FromStr for SaveKey {
    type Err = UnknownSaveKey;

    /// Case-sensitive, matching the identifiers used in story tags.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SaveKey::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| UnknownSaveKey(value.to_string()))
    }
}

/// Satisfied progression flags. Owned by the save system, mutated by tags.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionState {
    defined_keys: HashSet<SaveKey>,
    arbitrary_keys: Vec<String>,
}

impl ProgressionState {
    /// Fresh progression as written by a first save. `wipe` skips `GAME_STARTED`.
    pub fn new_game(wipe: bool) -> Self {
        let mut defined_keys = HashSet::from([SaveKey::None]);
        if !wipe {
            defined_keys.insert(SaveKey::GameStarted);
        }

        Self {
            defined_keys,
            arbitrary_keys: vec!["none".to_string()],
        }
    }

    pub fn check_key(&self, key: SaveKey) -> bool {
        self.defined_keys.contains(&key)
    }

    pub fn add_key(&mut self, key: SaveKey) {
        self.defined_keys.insert(key);
    }

    pub fn check_arbitrary_key(&self, name: &str) -> bool {
        self.arbitrary_keys.iter().any(|key| key == name)
    }

    pub fn add_arbitrary_key(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.check_arbitrary_key(&name) {
            self.arbitrary_keys.push(name);
        }
    }

    pub fn arbitrary_keys(&self) -> &[String] {
        &self.arbitrary_keys
    }

    /// Writes the flags as JSON so a save file can pick them up.
    pub fn write_snapshot(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self).map_err(io::Error::other)
    }
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new_game(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_seeds_sentinel_keys() {
        let fresh = ProgressionState::new_game(false);
        assert!(fresh.check_key(SaveKey::None));
        assert!(fresh.check_key(SaveKey::GameStarted));
        assert!(fresh.check_arbitrary_key("none"));

        let wiped = ProgressionState::new_game(true);
        assert!(wiped.check_key(SaveKey::None));
        assert!(!wiped.check_key(SaveKey::GameStarted));
    }

    #[test]
    fn arbitrary_keys_are_deduplicated() {
        let mut state = ProgressionState::new_game(true);
        state.add_arbitrary_key("midnight_deal");
        state.add_arbitrary_key("midnight_deal");

        assert_eq!(state.arbitrary_keys(), ["none", "midnight_deal"]);
    }

    #[test]
    fn parses_keys_case_sensitively() {
        assert_eq!("CELLAR_KEY".parse::<SaveKey>(), Ok(SaveKey::CellarKey));
        assert_eq!(
            "cellar_key".parse::<SaveKey>(),
            Err(UnknownSaveKey("cellar_key".to_string()))
        );
    }

    #[test]
    fn serializes_with_tag_identifiers() {
        let mut state = ProgressionState::new_game(true);
        state.add_key(SaveKey::LanternLit);

        let json = serde_json::to_string(&state).expect("progression serializes");
        assert!(json.contains("LANTERN_LIT"));

        let restored: ProgressionState = serde_json::from_str(&json).expect("round trip");
        assert_eq!(restored, state);
    }

    #[test]
    fn snapshot_creates_missing_directories() {
        let mut state = ProgressionState::new_game(false);
        state.add_key(SaveKey::CellarKey);
        state.add_arbitrary_key("midnight_deal");

        let path = std::env::temp_dir()
            .join("hollowlight-progression-test")
            .join("progression.json");
        state.write_snapshot(&path).expect("snapshot written");

        let data = fs::read_to_string(&path).expect("snapshot readable");
        let restored: ProgressionState = serde_json::from_str(&data).expect("snapshot parses");
        assert_eq!(restored, state);
    }
}
