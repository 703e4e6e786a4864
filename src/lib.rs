//! `namedeck` - bilingual name-origin flashcards
//!
//! Loads a catalog, its name origins and category metadata, joins them into
//! cards, and renders them as paged HTML sheets for large and small
//! layouts. Native-language names can be spoken through a speech engine
//! after kanji are rewritten into readings.

pub mod cli;
pub mod config;
pub mod data;
pub mod deck;
pub mod device;
pub mod error;
pub mod layout;
pub mod navigation;
pub mod observability;
pub mod pager;
pub mod reading;
pub mod server;
pub mod speech;
