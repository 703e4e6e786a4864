//! Speech-dispatcher engine.
//!
//! Runs `spd-say` once per utterance and waits for it to finish speaking.
//! Cancellation and the timeout both kill the child. Stderr is drained
//! while waiting so a chatty child cannot stall on a full pipe.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::{SpeechEngine, Utterance, Voice};
use crate::config::SpeechConfig;
use crate::error::SpeechError;

/// Subprocess engine backed by speech-dispatcher.
#[derive(Debug, Clone)]
pub struct SpdSayEngine {
    program: Option<PathBuf>,
    timeout: Duration,
}

impl SpdSayEngine {
    /// Resolves the configured command on `PATH`.
    ///
    /// A command that cannot be found leaves the engine unavailable rather
    /// than failing construction.
    #[must_use]
    pub fn new(config: &SpeechConfig) -> Self {
        let program = resolve_program(&config.command, std::env::var_os("PATH"));
        if program.is_none() {
            tracing::info!(command = %config.command, "speech command not found; speech disabled");
        }
        Self {
            program,
            timeout: config.timeout,
        }
    }

    /// Maps a BCP 47 tag to the language code `spd-say -l` expects.
    #[must_use]
    pub fn language_code(lang: &str) -> &'static str {
        match lang {
            "ja-JP" => "ja",
            "fr-FR" => "fr",
            "de-DE" => "de",
            "es-ES" => "es",
            _ => "en",
        }
    }

    fn args(utterance: &Utterance) -> Vec<String> {
        let mut args = vec![
            "-w".to_string(),
            "-l".to_string(),
            Self::language_code(&utterance.lang).to_string(),
            "-r".to_string(),
            scale(utterance.rate - 1.0).to_string(),
            "-p".to_string(),
            scale(utterance.pitch - 1.0).to_string(),
            "-i".to_string(),
            scale(utterance.volume.mul_add(2.0, -1.0)).to_string(),
        ];
        if let Some(voice) = &utterance.voice {
            args.push("-y".to_string());
            args.push(voice.name.clone());
        }
        args.push("--".to_string());
        args.push(utterance.text.clone());
        args
    }
}

/// Maps a `[-1, 1]` offset onto speech-dispatcher's `[-100, 100]` scale.
#[allow(clippy::cast_possible_truncation)]
fn scale(offset: f32) -> i32 {
    (offset * 100.0).round().clamp(-100.0, 100.0) as i32
}

fn resolve_program(command: &str, path_var: Option<OsString>) -> Option<PathBuf> {
    let direct = Path::new(command);
    if direct.components().count() > 1 {
        return direct.is_file().then(|| direct.to_path_buf());
    }
    std::env::split_paths(&path_var?)
        .map(|dir| dir.join(command))
        .find(|candidate| candidate.is_file())
}

#[async_trait::async_trait]
impl SpeechEngine for SpdSayEngine {
    fn is_available(&self) -> bool {
        self.program.is_some()
    }

    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    async fn speak(
        &self,
        utterance: &Utterance,
        cancel: CancellationToken,
    ) -> Result<(), SpeechError> {
        let program = self.program.as_ref().ok_or(SpeechError::Unavailable)?;

        let child = tokio::process::Command::new(program)
            .args(Self::args(utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::Failed(e.to_string()))?;

        // Dropping the wait future drops the child, which kills it.
        let output = tokio::select! {
            () = cancel.cancelled() => return Err(SpeechError::Canceled),
            waited = tokio::time::timeout(self.timeout, child.wait_with_output()) => {
                waited.map_err(|_| SpeechError::Timeout)?
            }
        }
        .map_err(|e| SpeechError::Failed(e.to_string()))?;

        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(SpeechError::Failed(format!(
            "{} exited with {}: {}",
            program.display(),
            output.status,
            stderr.trim()
        )))
    }

    fn name(&self) -> &'static str {
        "spd-say"
    }
}
