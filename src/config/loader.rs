//! Configuration loader
//!
//! Loading pipeline:
//! 1. Environment variable expansion (pre-parse, on raw text)
//! 2. YAML parsing into [`DeckConfig`]
//! 3. Relative data paths resolved against the file's directory
//! 4. Validation

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::schema::DeckConfig;
use crate::error::ConfigError;

/// `$${...}` escapes, `${VAR}` and `${VAR:-default}`.
static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\$|\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
        .expect("env var pattern is valid")
});

/// Warning produced while loading a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,
    /// Location where the warning occurred.
    pub location: Option<String>,
}

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated configuration.
    pub config: DeckConfig,
    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Loads, expands and validates a YAML configuration file.
///
/// # Errors
///
/// Returns [`ConfigError::MissingFile`] if the file cannot be read,
/// [`ConfigError::ParseError`] on invalid YAML, or
/// [`ConfigError::InvalidValue`] if validation fails.
pub fn load_config(path: &Path) -> Result<LoadResult, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
        path: path.to_path_buf(),
    })?;
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);

    let mut warnings = Vec::new();
    let expanded = expand_env(raw, &path.display().to_string(), &mut warnings);

    let mut config: DeckConfig = if expanded.trim().is_empty() {
        DeckConfig::default()
    } else {
        serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    if let Some(base) = path.parent() {
        config.data = config.data.relative_to(base);
        if let Some(readings) = config.speech.readings.take() {
            config.speech.readings = Some(if readings.is_relative() {
                base.join(readings)
            } else {
                readings
            });
        }
    }

    validate(&config)?;
    Ok(LoadResult { config, warnings })
}

/// Expands `${VAR}` and `${VAR:-default}` references.
///
/// An unset variable without a default expands to the empty string and
/// records a warning. `$$` is a literal `$`.
fn expand_env(raw: &str, location: &str, warnings: &mut Vec<LoadWarning>) -> String {
    ENV_VAR
        .replace_all(raw, |caps: &Captures<'_>| {
            let Some(name) = caps.get(1) else {
                return "$".to_string();
            };
            match std::env::var(name.as_str()) {
                Ok(value) => value,
                Err(_) => {
                    if let Some(default) = caps.get(2) {
                        default.as_str().to_string()
                    } else {
                        warnings.push(LoadWarning {
                            message: format!(
                                "environment variable '{}' is not set, using empty string",
                                name.as_str()
                            ),
                            location: Some(location.to_string()),
                        });
                        String::new()
                    }
                }
            }
        })
        .into_owned()
}

/// Checks value ranges serde cannot express.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for the first offending field.
pub fn validate(config: &DeckConfig) -> Result<(), ConfigError> {
    if config.layout.cards_per_sheet == 0 {
        return Err(invalid(
            "layout.cards_per_sheet",
            "0",
            "a positive integer",
        ));
    }
    for (field, value) in [
        ("speech.native_lang", &config.speech.native_lang),
        ("speech.fallback_lang", &config.speech.fallback_lang),
        ("speech.command", &config.speech.command),
    ] {
        if value.trim().is_empty() {
            return Err(invalid(field, value, "a non-empty string"));
        }
    }
    for (field, source) in [
        ("data.catalog", &config.data.catalog),
        ("data.origins", &config.data.origins),
        ("data.categories", &config.data.categories),
    ] {
        if source.to_string().trim().is_empty() {
            return Err(invalid(field, "", "a file path or URL"));
        }
    }
    for (field, value, range, expected) in [
        ("speech.rate", config.speech.rate, 0.1..=10.0, "a value between 0.1 and 10"),
        ("speech.pitch", config.speech.pitch, 0.0..=2.0, "a value between 0 and 2"),
        ("speech.volume", config.speech.volume, 0.0..=1.0, "a value between 0 and 1"),
    ] {
        if !range.contains(&value) {
            return Err(invalid(field, &value.to_string(), expected));
        }
    }
    Ok(())
}

fn invalid(field: &str, value: &str, expected: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataSource;
    use std::time::Duration;

    fn write(dir: &Path, text: &str) -> std::path::PathBuf {
        let path = dir.join("namedeck.yaml");
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn loads_and_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "data:\n  catalog: data/catalog.json\n  origins: https://x/o.json\nspeech:\n  readings: r.json\n",
        );
        let result = load_config(&path).unwrap();
        assert_eq!(
            result.config.data.catalog,
            DataSource::Path(dir.path().join("data/catalog.json"))
        );
        assert_eq!(
            result.config.data.origins,
            DataSource::Url("https://x/o.json".into())
        );
        assert_eq!(
            result.config.speech.readings,
            Some(dir.path().join("r.json"))
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn empty_file_is_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "");
        let config = load_config(&path).unwrap().config;
        assert_eq!(config.layout.cards_per_sheet, 4);
        assert_eq!(config.navigation.guard, Duration::from_millis(200));
    }

    #[test]
    fn missing_file() {
        let err = load_config(Path::new("/nonexistent/namedeck.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "layout: [unclosed\n");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("namedeck.yaml"));
    }

    #[test]
    fn zero_cards_per_sheet_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "layout:\n  cards_per_sheet: 0\n");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("cards_per_sheet"));
    }

    #[test]
    fn empty_language_rejected() {
        let mut config = DeckConfig::default();
        config.speech.fallback_lang = "  ".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("fallback_lang"));
    }

    #[test]
    fn out_of_range_prosody_rejected() {
        let mut config = DeckConfig::default();
        config.speech.pitch = 2.5;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("speech.pitch"), "{err}");

        let mut config = DeckConfig::default();
        config.speech.volume = -0.1;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("speech.volume"), "{err}");

        let mut config = DeckConfig::default();
        config.speech.pitch = f32::NAN;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn prosody_bounds_accepted() {
        let mut config = DeckConfig::default();
        config.speech.pitch = 0.0;
        config.speech.volume = 1.0;
        config.speech.rate = 10.0;
        validate(&config).unwrap();
    }

    #[test]
    fn pitch_from_yaml_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "speech:\n  pitch: 3.0\n");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("speech.pitch"), "{err}");
    }

    #[test]
    fn env_default_used_when_unset() {
        let mut warnings = Vec::new();
        let out = expand_env(
            "command: ${NAMEDECK_TEST_SURELY_UNSET_VAR:-espeak}",
            "t",
            &mut warnings,
        );
        assert_eq!(out, "command: espeak");
        assert!(warnings.is_empty());
    }

    #[test]
    fn env_unset_without_default_warns() {
        let mut warnings = Vec::new();
        let out = expand_env("x: '${NAMEDECK_TEST_SURELY_UNSET_VAR}'", "t", &mut warnings);
        assert_eq!(out, "x: ''");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("NAMEDECK_TEST_SURELY_UNSET_VAR"));
    }

    #[test]
    fn env_set_variable_expands() {
        let mut warnings = Vec::new();
        // PATH is set in every test environment.
        let out = expand_env("${PATH}", "t", &mut warnings);
        assert_eq!(out, std::env::var("PATH").unwrap());
    }

    #[test]
    fn double_dollar_is_literal() {
        let mut warnings = Vec::new();
        assert_eq!(expand_env("cost: $$5", "t", &mut warnings), "cost: $5");
    }
}
