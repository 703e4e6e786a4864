//! Configuration schema.
//!
//! Every field has a default, so an empty or absent configuration file
//! yields a working deck. Durations are written as humantime strings
//! (`"200ms"`, `"5s"`).

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::data::DataSources;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeckConfig {
    /// The three JSON sources.
    pub data: DataSources,
    /// Sheet partitioning and device classification.
    pub layout: LayoutConfig,
    /// Navigation timing.
    pub navigation: NavigationConfig,
    /// Speech playback.
    pub speech: SpeechConfig,
}

/// Layout settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Cards per sheet on large layouts.
    pub cards_per_sheet: usize,
    /// Viewports at or below this width (CSS px) use the small layout.
    pub small_max_width: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cards_per_sheet: 4,
            small_max_width: 768,
        }
    }
}

/// Navigation timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// How long scroll samples are ignored after a programmatic navigation.
    #[serde(with = "humantime_serde")]
    pub guard: Duration,
    /// Minimum spacing between processed scroll samples.
    #[serde(with = "humantime_serde")]
    pub scroll_throttle: Duration,
    /// Delay between an orientation change and the layout rebuild.
    #[serde(with = "humantime_serde")]
    pub orientation_settle: Duration,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            guard: Duration::from_millis(200),
            scroll_throttle: Duration::from_millis(16),
            orientation_settle: Duration::from_millis(100),
        }
    }
}

/// Speech settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpeechConfig {
    /// Language tag whose text is passed through the reading table.
    pub native_lang: String,
    /// Language tag retried once when native playback fails.
    pub fallback_lang: String,
    /// Speaking rate.
    pub rate: f32,
    /// Voice pitch.
    pub pitch: f32,
    /// Output volume.
    pub volume: f32,
    /// How long a failure notification stays visible.
    #[serde(with = "humantime_serde")]
    pub notification_ttl: Duration,
    /// External reading table replacing the embedded one.
    pub readings: Option<PathBuf>,
    /// Speech command used by the subprocess engine.
    pub command: String,
    /// Time limit for one subprocess utterance.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            native_lang: "ja-JP".to_string(),
            fallback_lang: "en-US".to_string(),
            rate: 0.8,
            pitch: 1.0,
            volume: 1.0,
            notification_ttl: Duration::from_secs(5),
            readings: None,
            command: "spd-say".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// `serde(with)` adapter for humantime duration strings.
mod humantime_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_mapping_is_all_defaults() {
        let config: DeckConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, DeckConfig::default());
        assert_eq!(config.layout.cards_per_sheet, 4);
        assert_eq!(config.navigation.guard, Duration::from_millis(200));
        assert_eq!(config.speech.native_lang, "ja-JP");
    }

    #[test]
    fn durations_parse_from_humantime() {
        let yaml = "navigation:\n  guard: 350ms\n  orientation_settle: 1s\n";
        let config: DeckConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.navigation.guard, Duration::from_millis(350));
        assert_eq!(config.navigation.orientation_settle, Duration::from_secs(1));
        assert_eq!(config.navigation.scroll_throttle, Duration::from_millis(16));
    }

    #[test]
    fn bad_duration_is_rejected() {
        let yaml = "speech:\n  timeout: soon\n";
        assert!(serde_yaml::from_str::<DeckConfig>(yaml).is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let yaml = "layout:\n  cards_per_page: 6\n";
        assert!(serde_yaml::from_str::<DeckConfig>(yaml).is_err());
    }

    #[test]
    fn durations_serialize_as_strings() {
        let yaml = serde_yaml::to_string(&NavigationConfig::default()).unwrap();
        assert!(yaml.contains("guard: 200ms"), "{yaml}");
    }
}
