mod common;

use common::{fixture_path, run, run_with_fixtures, stderr, stdout};

// ============================================================================
// render command
// ============================================================================

#[test]
fn render_document_large() {
    let output = run_with_fixtures("render", &["--quiet"]);
    assert!(
        output.status.success(),
        "render should exit 0: {}",
        stderr(&output)
    );

    let html = stdout(&output);
    assert!(html.starts_with("<!DOCTYPE html>"), "not a document: {html}");
    assert!(html.contains("<title>Name Origin Flashcards</title>"));
    assert!(html.contains("data-device='large'"));
    // 6 cards at 4 per sheet
    assert_eq!(html.matches("<section class='sheet").count(), 2);
    assert_eq!(html.matches("<section class='sheet hidden'").count(), 1);
    assert!(html.contains("Bulbasaur"));
    assert!(html.contains("fetch('speak'"));
}

#[test]
fn render_document_small_gives_every_face_a_sheet() {
    let output = run_with_fixtures("render", &["--quiet", "--device", "small"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let html = stdout(&output);
    assert!(html.contains("data-device='small'"));
    assert!(html.contains("mobile-scroll-container"));
    assert_eq!(html.matches("class='sheet card-face'").count(), 12);
}

#[test]
fn render_selected_page() {
    let output = run_with_fixtures(
        "render",
        &["--quiet", "--fragment", "sheets", "--page", "1"],
    );
    assert!(output.status.success(), "{}", stderr(&output));

    let html = stdout(&output);
    assert!(html.contains("<section class='sheet hidden' data-sheet='0'>"));
    assert!(html.contains("<section class='sheet' data-sheet='1'>"));
}

#[test]
fn render_page_out_of_range_is_usage_error() {
    let output = run_with_fixtures("render", &["--quiet", "--page", "5"]);
    assert_eq!(output.status.code(), Some(64), "{}", stderr(&output));
}

#[test]
fn render_pager_fragment() {
    let output = run_with_fixtures("render", &["--quiet", "--fragment", "pager"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let html = stdout(&output);
    assert!(html.contains("<button id='first' data-page='0' disabled>"));
    assert!(html.contains("<button id='last' data-page='1'>"));
    assert!(!html.contains("<!DOCTYPE html>"));
}

#[test]
fn render_cards_joins_all_sources() {
    let output = run_with_fixtures("render", &["--quiet", "--fragment", "cards"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let cards: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("cards output should be JSON");
    let cards = cards.as_array().expect("cards should be an array");
    assert_eq!(cards.len(), 6);

    let bulbasaur = &cards[0];
    assert_eq!(bulbasaur["english"], "Bulbasaur");
    assert_eq!(bulbasaur["hiragana"], "ふしぎだね");
    assert_eq!(
        bulbasaur["origin_elements"],
        serde_json::json!(["不思議", "種"])
    );
    assert_eq!(bulbasaur["category_icon"], "icons/grass.png");

    let pidgey = &cards[3];
    assert_eq!(pidgey["category"], "Colorless");
    assert_eq!(pidgey["origin_elements"], serde_json::json!([]));
    assert_eq!(pidgey["description"], "");
}

#[test]
fn render_to_output_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("deck.html");
    let output = run_with_fixtures(
        "render",
        &["--quiet", "--output", path.to_str().expect("utf-8 path")],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).is_empty());

    let html = std::fs::read_to_string(&path).expect("output file written");
    assert!(html.contains("Charmander"));
}

#[test]
fn render_missing_source_writes_error_page() {
    let output = run(&[
        "render",
        "--quiet",
        "--catalog",
        fixture_path("missing.json").to_str().expect("utf-8 path"),
        "--origins",
        fixture_path("origins.json").to_str().expect("utf-8 path"),
        "--categories",
        fixture_path("categories.json").to_str().expect("utf-8 path"),
    ]);
    assert_eq!(output.status.code(), Some(4), "{}", stderr(&output));

    let html = stdout(&output);
    assert!(html.contains("Error loading data"), "error page expected: {html}");
    assert!(html.contains("Please make sure the JSON files are available."));
}

#[test]
fn render_with_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("namedeck.yaml");
    std::fs::write(
        &config,
        format!(
            "data:\n  catalog: {}\n  origins: {}\n  categories: {}\nlayout:\n  cards_per_sheet: 2\n",
            fixture_path("catalog.json").display(),
            fixture_path("origins.json").display(),
            fixture_path("categories.json").display(),
        ),
    )
    .expect("write config");

    let output = run(&[
        "render",
        "--quiet",
        "--config",
        config.to_str().expect("utf-8 path"),
        "--fragment",
        "sheets",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output).matches("<section class='sheet").count(), 3);
}

#[test]
fn invalid_config_is_config_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("namedeck.yaml");
    std::fs::write(&config, "layout:\n  cards_per_sheet: 0\n").expect("write config");

    let output = run(&[
        "render",
        "--quiet",
        "--config",
        config.to_str().expect("utf-8 path"),
    ]);
    assert_eq!(output.status.code(), Some(2), "{}", stderr(&output));
    assert!(stderr(&output).contains("cards_per_sheet"));
}

// ============================================================================
// speak command
// ============================================================================

#[test]
fn speak_dry_run_applies_readings() {
    let output = run(&["speak", "--quiet", "--dry-run", "未来"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "みらい");
}

#[test]
fn speak_dry_run_leaves_other_languages_alone() {
    let output = run(&["speak", "--quiet", "--dry-run", "--lang", "en-US", "未来"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "未来");
}

#[test]
fn speak_dry_run_with_custom_readings() {
    let dir = tempfile::tempdir().expect("tempdir");
    let readings = dir.path().join("readings.json");
    std::fs::write(&readings, r#"[["種", "たね"]]"#).expect("write readings");

    let output = run(&[
        "speak",
        "--quiet",
        "--dry-run",
        "--readings",
        readings.to_str().expect("utf-8 path"),
        "種",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "たね");
}

// ============================================================================
// version and completions
// ============================================================================

#[test]
fn version_human() {
    let output = run(&["version"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("namedeck"));
}

#[test]
fn version_json() {
    let output = run(&["version", "--format", "json"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let parsed: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("version JSON should be valid");
    assert_eq!(parsed["name"], "namedeck");
    assert!(parsed["version"].is_string());
    assert!(parsed["readings"].as_u64().unwrap_or(0) > 0);
}

#[test]
fn completions_bash() {
    let output = run(&["completions", "bash"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("namedeck"));
}

#[test]
fn unknown_subcommand_fails() {
    let output = run(&["shuffle"]);
    assert!(!output.status.success());
}
