//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod render;
pub mod serve;
pub mod speak;
pub mod version;

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands, SourceArgs};
use crate::config::{DeckConfig, load_config, validate};
use crate::data::DataSource;
use crate::error::NamedeckError;
use crate::reading::ReadingTable;
use crate::speech::{LogNotifier, SpdSayEngine, Speaker};

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), NamedeckError> {
    match cli.command {
        Commands::Render(args) => render::run(&args).await,
        Commands::Serve(args) => serve::run(&args, cancel).await,
        Commands::Speak(args) => speak::run(&args).await,
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Loads the configuration file, if any, and applies source overrides.
///
/// Sources given on the command line are resolved against `--data-dir`
/// (or the working directory), not the configuration file's directory.
///
/// # Errors
///
/// Returns a configuration error if the file cannot be loaded or the
/// result fails validation.
pub fn load_deck_config(source: &SourceArgs) -> Result<DeckConfig, NamedeckError> {
    let mut config = match &source.config {
        Some(path) => load_config_file(path)?,
        None => DeckConfig::default(),
    };

    if let Some(catalog) = &source.catalog {
        config.data.catalog = DataSource::from(catalog.as_str());
    }
    if let Some(origins) = &source.origins {
        config.data.origins = DataSource::from(origins.as_str());
    }
    if let Some(categories) = &source.categories {
        config.data.categories = DataSource::from(categories.as_str());
    }
    if let Some(dir) = &source.data_dir {
        config.data = config.data.relative_to(dir);
    }

    validate(&config)?;
    Ok(config)
}

/// Loads a configuration file and logs its warnings.
///
/// # Errors
///
/// Returns a configuration error if loading fails.
pub fn load_config_file(path: &Path) -> Result<DeckConfig, NamedeckError> {
    tracing::info!(config = %path.display(), "loading configuration");
    let result = load_config(path)?;
    for warning in &result.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }
    Ok(result.config)
}

/// Builds the system speaker from configuration.
///
/// # Errors
///
/// Returns a configuration error if an external reading table is
/// configured and cannot be loaded.
pub fn build_speaker(config: &DeckConfig) -> Result<Speaker, NamedeckError> {
    let readings = match &config.speech.readings {
        Some(path) => ReadingTable::from_file(path)?,
        None => ReadingTable::embedded()?,
    };
    tracing::debug!(entries = readings.len(), "reading table loaded");
    Ok(Speaker::new(
        Arc::new(SpdSayEngine::new(&config.speech)),
        Arc::new(LogNotifier),
        readings,
        config.speech.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn overrides_replace_configured_sources() {
        let source = SourceArgs {
            catalog: Some("https://example.com/c.json".to_string()),
            origins: Some("o.json".to_string()),
            data_dir: Some(PathBuf::from("/data")),
            ..SourceArgs::default()
        };
        let config = load_deck_config(&source).unwrap();
        assert_eq!(
            config.data.catalog,
            DataSource::Url("https://example.com/c.json".to_string())
        );
        assert_eq!(config.data.origins, DataSource::Path("/data/o.json".into()));
        assert_eq!(
            config.data.categories,
            DataSource::Path("/data/tcg_types_info.json".into())
        );
    }

    #[test]
    fn missing_config_file_is_config_error() {
        let source = SourceArgs {
            config: Some(PathBuf::from("/nonexistent/namedeck.yaml")),
            ..SourceArgs::default()
        };
        let err = load_deck_config(&source).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn speaker_uses_embedded_readings_by_default() {
        let speaker = build_speaker(&DeckConfig::default()).unwrap();
        assert_eq!(speaker.native_lang(), "ja-JP");
    }
}
