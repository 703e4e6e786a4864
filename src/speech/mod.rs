//! Speech trigger.
//!
//! [`Speaker`] owns the single playback slot. Every request cancels the
//! one before it, native-language text goes through the [`ReadingTable`]
//! first, and a failed native request gets exactly one retry in the
//! fallback language before the user is notified. Callers never see an
//! error; they get a [`SpeechOutcome`].

mod spd_say;

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::reading::ReadingTable;

pub use spd_say::SpdSayEngine;

/// Shown when speech cannot be produced at all.
pub const UNAVAILABLE_MESSAGE: &str = "Speech synthesis not available. Please try Firefox browser.";

/// Voice names that mark a Japanese voice regardless of its language tag.
const JAPANESE_VOICE_HINTS: &[&str] = &["japanese", "nihongo", "japan"];

/// A voice offered by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Voice {
    /// Engine-specific voice name.
    pub name: String,
    /// BCP 47 language tag.
    pub lang: String,
}

/// One playback request as handed to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Request id; later requests have larger ids.
    pub id: u64,
    /// Text to speak, already transliterated.
    pub text: String,
    /// Requested language tag.
    pub lang: String,
    /// Chosen voice, or `None` for the engine default.
    pub voice: Option<Voice>,
    /// Speaking rate.
    pub rate: f32,
    /// Voice pitch.
    pub pitch: f32,
    /// Output volume.
    pub volume: f32,
}

/// Platform speech capability.
#[async_trait::async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Whether the engine can speak at all.
    fn is_available(&self) -> bool;

    /// Voices the engine offers. May be empty.
    fn voices(&self) -> Vec<Voice>;

    /// Speaks one utterance to completion.
    ///
    /// Must return [`SpeechError::Canceled`] promptly once `cancel` fires.
    async fn speak(&self, utterance: &Utterance, cancel: CancellationToken)
    -> Result<(), SpeechError>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// Transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Message text.
    pub message: String,
    /// How long the host should keep it visible.
    #[serde(with = "ttl_millis")]
    pub ttl: Duration,
}

/// Receives user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Shows a notification.
    fn notify(&self, notification: &Notification);
}

/// Notifier that writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::warn!(ttl = ?notification.ttl, "{}", notification.message);
    }
}

/// Result of a speak request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutcome {
    /// Playback finished in the given language.
    Spoken {
        /// Language that succeeded (the fallback if the retry was used).
        lang: String,
    },
    /// A newer request or [`Speaker::cancel`] took over the slot; this one
    /// was dropped silently.
    Superseded,
    /// The engine cancelled playback on its own.
    Canceled,
    /// Playback failed and the user was notified.
    Notified(Notification),
}

struct ActiveSlot {
    id: u64,
    cancel: CancellationToken,
}

/// Single-slot speech controller.
pub struct Speaker {
    engine: Arc<dyn SpeechEngine>,
    notifier: Arc<dyn Notifier>,
    readings: ReadingTable,
    config: SpeechConfig,
    next_id: AtomicU64,
    active: Mutex<Option<ActiveSlot>>,
}

impl std::fmt::Debug for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Speaker")
            .field("engine", &self.engine.name())
            .field("readings", &self.readings.len())
            .field("native_lang", &self.config.native_lang)
            .finish_non_exhaustive()
    }
}

impl Speaker {
    /// Creates a speaker with an idle slot.
    #[must_use]
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        notifier: Arc<dyn Notifier>,
        readings: ReadingTable,
        config: SpeechConfig,
    ) -> Self {
        Self {
            engine,
            notifier,
            readings,
            config,
            next_id: AtomicU64::new(1),
            active: Mutex::new(None),
        }
    }

    /// Native language tag.
    #[must_use]
    pub fn native_lang(&self) -> &str {
        &self.config.native_lang
    }

    /// Speaks `text` in `lang`, defaulting to the native language.
    pub async fn speak(&self, text: &str, lang: Option<&str>) -> SpeechOutcome {
        let lang = lang.unwrap_or(&self.config.native_lang);
        let native = lang == self.config.native_lang;

        if !self.engine.is_available() {
            tracing::warn!(engine = self.engine.name(), "speech engine unavailable");
            return self.notify_failure();
        }

        let text = if native {
            self.readings.apply(text)
        } else {
            text.to_string()
        };
        let (id, cancel) = self.claim_slot();

        let voices = self.engine.voices();
        let utterance = self.utterance(id, &text, lang, &voices);
        tracing::debug!(id, lang, voice = ?utterance.voice, text = %utterance.text, "speaking");

        let first = self.engine.speak(&utterance, cancel.clone()).await;
        if !self.is_active(id) {
            return SpeechOutcome::Superseded;
        }
        let error = match first {
            Ok(()) => return self.finish(id, SpeechOutcome::Spoken { lang: lang.to_string() }),
            Err(SpeechError::Canceled) => return self.finish(id, SpeechOutcome::Canceled),
            Err(error) => error,
        };

        if !native {
            tracing::warn!(id, lang, %error, "speech failed");
            self.release(id);
            return self.notify_failure();
        }

        let fallback = self.config.fallback_lang.clone();
        tracing::info!(id, lang, %error, fallback = %fallback, "retrying speech in fallback language");
        let retry = self.utterance(id, &text, &fallback, &voices);
        let second = self.engine.speak(&retry, cancel).await;
        if !self.is_active(id) {
            return SpeechOutcome::Superseded;
        }
        match second {
            Ok(()) => self.finish(id, SpeechOutcome::Spoken { lang: fallback }),
            Err(SpeechError::Canceled) => self.finish(id, SpeechOutcome::Canceled),
            Err(error) => {
                tracing::warn!(id, lang = %fallback, %error, "fallback speech failed");
                self.release(id);
                self.notify_failure()
            }
        }
    }

    /// Cancels whatever is playing.
    pub fn cancel(&self) {
        if let Some(slot) = self.lock_slot().take() {
            slot.cancel.cancel();
        }
    }

    fn utterance(&self, id: u64, text: &str, lang: &str, voices: &[Voice]) -> Utterance {
        Utterance {
            id,
            text: text.to_string(),
            lang: lang.to_string(),
            voice: select_voice(voices, lang, &self.config.native_lang).cloned(),
            rate: self.config.rate,
            pitch: self.config.pitch,
            volume: self.config.volume,
        }
    }

    fn lock_slot(&self) -> std::sync::MutexGuard<'_, Option<ActiveSlot>> {
        self.active
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn claim_slot(&self) -> (u64, CancellationToken) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        let previous = self.lock_slot().replace(ActiveSlot {
            id,
            cancel: cancel.clone(),
        });
        if let Some(previous) = previous {
            tracing::debug!(superseded = previous.id, by = id, "cancelling in-flight speech");
            previous.cancel.cancel();
        }
        (id, cancel)
    }

    fn is_active(&self, id: u64) -> bool {
        self.lock_slot().as_ref().is_some_and(|slot| slot.id == id)
    }

    fn release(&self, id: u64) {
        let mut slot = self.lock_slot();
        if slot.as_ref().is_some_and(|s| s.id == id) {
            *slot = None;
        }
    }

    fn finish(&self, id: u64, outcome: SpeechOutcome) -> SpeechOutcome {
        self.release(id);
        outcome
    }

    fn notify_failure(&self) -> SpeechOutcome {
        let notification = Notification {
            message: UNAVAILABLE_MESSAGE.to_string(),
            ttl: self.config.notification_ttl,
        };
        self.notifier.notify(&notification);
        SpeechOutcome::Notified(notification)
    }
}

/// Picks the best voice for `lang`.
///
/// For the native language: the first voice whose tag shares its primary
/// subtag, or whose name carries a Japanese hint. For other languages: the
/// first voice sharing the primary subtag. `None` means engine default.
#[must_use]
pub fn select_voice<'a>(voices: &'a [Voice], lang: &str, native_lang: &str) -> Option<&'a Voice> {
    let primary = primary_subtag(lang);
    let by_tag = |voice: &&Voice| primary_subtag(&voice.lang).eq_ignore_ascii_case(primary);
    if lang == native_lang {
        voices.iter().find(|voice| {
            let name = voice.name.to_lowercase();
            by_tag(voice) || JAPANESE_VOICE_HINTS.iter().any(|hint| name.contains(hint))
        })
    } else {
        voices.iter().find(by_tag)
    }
}

fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}

mod ttl_millis {
    use std::time::Duration;

    use serde::Serializer;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }
}
