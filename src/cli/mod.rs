//! Command-line interface
//!
//! Argument definitions and command handlers for the `namedeck` binary.

pub mod args;
pub mod commands;
