//! Error types for `namedeck`
//!
//! Domain errors for data loading, configuration, speech and the HTTP
//! server, aggregated into [`NamedeckError`] with CLI exit code mapping.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `namedeck` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Deck data could not be loaded (read, fetch or parse failure)
    pub const DATA_ERROR: i32 = 4;

    /// HTTP server error (bind failure, serve failure)
    pub const SERVER_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `namedeck` operations.
#[derive(Debug, Error)]
pub enum NamedeckError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Deck data loading error
    #[error(transparent)]
    Data(#[from] DataError),

    /// Speech engine error
    #[error(transparent)]
    Speech(#[from] SpeechError),

    /// HTTP server error
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Invalid command-line usage
    #[error("usage error: {0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NamedeckError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Data(_) => ExitCode::DATA_ERROR,
            Self::Server(_) => ExitCode::SERVER_ERROR,
            Self::Speech(_) => ExitCode::ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },

    /// Configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Reading table asset could not be parsed or is malformed
    #[error("invalid reading table {source_name}: {message}")]
    ReadingTable {
        /// Where the table came from (file path or `<embedded>`)
        source_name: String,
        /// Description of the problem
        message: String,
    },
}

// ============================================================================
// Data Errors
// ============================================================================

/// Errors raised while loading the three deck sources.
///
/// Any of these is fatal to rendering: the deck is replaced by the
/// static error page.
#[derive(Debug, Error)]
pub enum DataError {
    /// Reading a local source failed
    #[error("failed to read {source_name}: {error}")]
    Read {
        /// Source location
        source_name: String,
        /// Underlying I/O error
        error: std::io::Error,
    },

    /// Fetching a remote source failed
    #[error("failed to fetch {source_name}: {message}")]
    Fetch {
        /// Source URL
        source_name: String,
        /// Transport or status error
        message: String,
    },

    /// A source was not valid JSON of the expected shape
    #[error("failed to parse {source_name}: {error}")]
    Parse {
        /// Source location
        source_name: String,
        /// Underlying JSON error
        error: serde_json::Error,
    },
}

// ============================================================================
// Speech Errors
// ============================================================================

/// Errors reported by a speech engine.
///
/// These never escape [`crate::speech::Speaker::speak`]; they drive the
/// fallback and notification path instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    /// The platform has no speech capability at all
    #[error("speech synthesis not available")]
    Unavailable,

    /// The utterance was cancelled (superseded by a newer request)
    #[error("utterance canceled")]
    Canceled,

    /// The engine failed to speak the utterance
    #[error("speech synthesis failed: {0}")]
    Failed(String),

    /// The engine did not finish in time
    #[error("speech synthesis timed out")]
    Timeout,
}

// ============================================================================
// Server Errors
// ============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The bind address could not be parsed
    #[error("invalid bind address \"{input}\": {message}")]
    InvalidAddress {
        /// Address as given
        input: String,
        /// Parser message
        message: String,
    },

    /// Binding or serving failed
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `namedeck` operations.
pub type Result<T> = std::result::Result<T, NamedeckError>;

// ============================================================================
// Tests
// ============================================================================
