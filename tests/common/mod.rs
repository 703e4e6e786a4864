//! Shared integration-test harness for running the `namedeck` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Runs the `namedeck` binary with the given arguments and captures its
/// output. Logging goes to stderr and never pollutes stdout.
#[allow(clippy::missing_panics_doc)]
pub fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_namedeck"))
        .args(args)
        .env_remove("NAMEDECK_CONFIG")
        .env_remove("NAMEDECK_LOG_LEVEL")
        .env("NAMEDECK_COLOR", "never")
        .output()
        .expect("failed to spawn namedeck")
}

/// Absolute path of a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Source flags pointing at the fixture deck.
pub fn fixture_sources() -> Vec<String> {
    vec![
        "--data-dir".to_string(),
        fixture_path("").display().to_string(),
        "--catalog".to_string(),
        "catalog.json".to_string(),
        "--origins".to_string(),
        "origins.json".to_string(),
        "--categories".to_string(),
        "categories.json".to_string(),
    ]
}

/// Runs `namedeck <command> <fixture sources> <extra>`.
pub fn run_with_fixtures(command: &str, extra: &[&str]) -> Output {
    let sources = fixture_sources();
    let mut args: Vec<&str> = vec![command];
    args.extend(sources.iter().map(String::as_str));
    args.extend_from_slice(extra);
    run(&args)
}

/// Stdout as UTF-8 text.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr as UTF-8 text.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
