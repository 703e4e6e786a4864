//! Configuration module
//!
//! Loading and validation of the optional `namedeck` YAML configuration.

pub mod loader;
pub mod schema;

pub use loader::{LoadResult, LoadWarning, load_config, validate};
pub use schema::*;
