//! Observability
//!
//! Structured `tracing` logs on stderr.

pub mod logging;

pub use logging::{LOG_LEVEL_ENV, LogFormat, init_logging};
