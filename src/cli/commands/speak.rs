//! `speak` command

use crate::cli::args::SpeakArgs;
use crate::cli::commands::{build_speaker, load_config_file};
use crate::config::{DeckConfig, validate};
use crate::error::{NamedeckError, SpeechError};
use crate::reading::ReadingTable;
use crate::speech::SpeechOutcome;

/// Speak the given text, or print its transliteration with `--dry-run`.
///
/// # Errors
///
/// Returns a configuration error for bad configuration or a reading table
/// that cannot be loaded, and a speech error if playback failed.
pub async fn run(args: &SpeakArgs) -> Result<(), NamedeckError> {
    let mut config = match &args.config {
        Some(path) => load_config_file(path)?,
        None => DeckConfig::default(),
    };
    if let Some(readings) = &args.readings {
        config.speech.readings = Some(readings.clone());
    }
    validate(&config)?;

    let text = args.text.join(" ");
    let lang = args.lang.as_deref();

    if args.dry_run {
        let native = lang.is_none_or(|l| l == config.speech.native_lang);
        let spoken = if native {
            let table = match &config.speech.readings {
                Some(path) => ReadingTable::from_file(path)?,
                None => ReadingTable::embedded()?,
            };
            table.apply(&text)
        } else {
            text
        };
        println!("{spoken}");
        return Ok(());
    }

    let speaker = build_speaker(&config)?;
    match speaker.speak(&text, lang).await {
        SpeechOutcome::Spoken { lang } => {
            tracing::info!(%lang, "spoken");
            Ok(())
        }
        SpeechOutcome::Superseded | SpeechOutcome::Canceled => {
            Err(SpeechError::Canceled.into())
        }
        SpeechOutcome::Notified(notification) => {
            Err(SpeechError::Failed(notification.message).into())
        }
    }
}
