//! Kanji reading substitution for speech input.
//!
//! Speech engines without a Japanese dictionary mispronounce kanji, so
//! native-language text is rewritten into hiragana readings before it is
//! spoken. The table is an ordered list of `[key, reading]` pairs loaded
//! from a JSON asset; entry order is significant.

use std::path::Path;

use serde::Deserialize;
use wana_kana::ConvertJapanese;

use crate::error::ConfigError;

/// Reading table shipped with the crate.
const EMBEDDED_READINGS: &str = include_str!("../assets/readings.json");

/// One `[key, reading]` pair of the asset file.
#[derive(Debug, Deserialize)]
struct RawEntry(String, String);

/// Ordered literal substitution table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingTable {
    entries: Vec<(String, String)>,
}

impl ReadingTable {
    /// Builds a table from pairs, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadingTable`] if any key is empty. An empty
    /// key would match between every character.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries = Vec::new();
        for (index, (key, reading)) in pairs.into_iter().enumerate() {
            let key = key.into();
            if key.is_empty() {
                return Err(ConfigError::ReadingTable {
                    source_name: "<pairs>".to_string(),
                    message: format!("entry {index} has an empty key"),
                });
            }
            entries.push((key, reading.into()));
        }
        Ok(Self { entries })
    }

    /// Parses a table from JSON text (`[["火", "ひ"], ...]`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadingTable`] on malformed JSON or empty keys.
    pub fn from_json(source_name: &str, json: &str) -> Result<Self, ConfigError> {
        let raw: Vec<RawEntry> =
            serde_json::from_str(json).map_err(|e| ConfigError::ReadingTable {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;
        Self::from_pairs(raw.into_iter().map(|RawEntry(k, v)| (k, v))).map_err(|e| match e {
            ConfigError::ReadingTable { message, .. } => ConfigError::ReadingTable {
                source_name: source_name.to_string(),
                message,
            },
            other => other,
        })
    }

    /// Loads a table from an external JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if the file cannot be read, or
    /// [`ConfigError::ReadingTable`] if it is malformed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        Self::from_json(&path.display().to_string(), &text)
    }

    /// The table compiled into the binary.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded asset is malformed.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_json("<embedded>", EMBEDDED_READINGS)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrites every occurrence of each key with its reading.
    ///
    /// Entries are applied in table order over the progressively rewritten
    /// string, so an earlier entry wins when a compound and one of its
    /// components are both present.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (key, reading) in &self.entries {
            if result.contains(key.as_str()) {
                result = result.replace(key.as_str(), reading);
            }
        }
        result
    }
}

/// Converts katakana to hiragana, leaving everything else untouched.
///
/// Used to derive a missing `hiragana` field from the catalog's kana name.
#[must_use]
pub fn katakana_to_hiragana(text: &str) -> String {
    text.to_hiragana()
}
