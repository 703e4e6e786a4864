//! Deck data model.
//!
//! The deck is built from three read-only JSON sources: the catalog array,
//! the origin map keyed by catalog identifier, and the category map keyed
//! by category tag. [`build_cards`] joins them into immutable [`Card`]s.

pub mod loader;

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::reading::katakana_to_hiragana;

pub use loader::{DataSource, DataSources, load_cards, load_dataset};

/// Category used when a catalog entry has no tag or its tag is unknown.
pub const DEFAULT_CATEGORY: &str = "Colorless";

/// Footnote markers such as `[ 1 ]` left in scraped descriptions.
static FOOTNOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\[\s*\d+\s*\]\s*").expect("footnote pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Catalog identifier.
    pub ndex: u32,
    /// Katakana name.
    #[serde(rename = "kanaName")]
    pub kana_name: String,
    /// Hiragana reading, when the dataset provides one.
    #[serde(default)]
    pub hiragana: Option<String>,
    /// Hepburn romanization.
    #[serde(rename = "hepburnName", default)]
    pub hepburn_name: String,
    /// Officially published romanized name.
    #[serde(rename = "publishedName", default)]
    pub published_name: String,
    /// English name.
    #[serde(default)]
    pub english: String,
    /// Image reference (URL or relative path).
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    /// Category tag.
    #[serde(default)]
    pub tcg_type: Option<String>,
}

/// Name-origin metadata for one catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginRecord {
    /// Ordered origin fragments; the first is the name itself.
    #[serde(rename = "nameOriginElements", default)]
    pub elements: Vec<String>,
    /// Free-text etymology.
    #[serde(rename = "nameOriginDescription", default)]
    pub description: String,
}

/// Display metadata for a category tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Accent color (`#rrggbb`).
    #[serde(default)]
    pub color: Option<String>,
    /// Icon reference.
    #[serde(default)]
    pub icon_url: Option<String>,
}

/// The three parsed sources, before joining.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Catalog entries in display order.
    pub catalog: Vec<RawRecord>,
    /// Origin metadata by identifier.
    pub origins: HashMap<String, OriginRecord>,
    /// Category metadata by tag.
    pub categories: HashMap<String, CategoryInfo>,
}

/// Joined view-model for one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    /// Catalog identifier.
    pub id: u32,
    /// Katakana name.
    pub kana: String,
    /// Hiragana reading.
    pub hiragana: String,
    /// Published romanized name.
    pub published: String,
    /// Hepburn romanization.
    pub hepburn: String,
    /// English name.
    pub english: String,
    /// Image reference.
    pub image: String,
    /// Origin fragments without the leading name element.
    pub origin_elements: Vec<String>,
    /// Etymology text with footnote markers removed.
    pub description: String,
    /// Category tag.
    pub category: String,
    /// Category icon, if any.
    pub category_icon: Option<String>,
}

/// Removes `[ n ]` footnote markers and collapses whitespace.
#[must_use]
pub fn clean_footnotes(text: &str) -> String {
    let without_markers = FOOTNOTE.replace_all(text, " ");
    WHITESPACE
        .replace_all(&without_markers, " ")
        .trim()
        .to_string()
}

/// Joins the three sources into cards, one per catalog entry, in catalog order.
///
/// Missing origin records yield no elements and an empty description; a
/// missing or unknown category falls back to [`DEFAULT_CATEGORY`]'s icon.
#[must_use]
pub fn build_cards(dataset: &Dataset) -> Vec<Card> {
    dataset
        .catalog
        .iter()
        .map(|record| build_card(record, dataset))
        .collect()
}

fn build_card(record: &RawRecord, dataset: &Dataset) -> Card {
    let key = record.ndex.to_string();
    let origin = dataset.origins.get(&key);
    if origin.is_none() {
        tracing::debug!(id = record.ndex, "no origin record, using defaults");
    }

    let category = record
        .tcg_type
        .clone()
        .filter(|tag| !tag.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let info = dataset
        .categories
        .get(&category)
        .or_else(|| dataset.categories.get(DEFAULT_CATEGORY));
    if info.is_none() {
        tracing::debug!(id = record.ndex, %category, "no category info, rendering without icon");
    }

    let hiragana = record
        .hiragana
        .clone()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| katakana_to_hiragana(&record.kana_name));

    Card {
        id: record.ndex,
        kana: record.kana_name.clone(),
        hiragana,
        published: record.published_name.clone(),
        hepburn: record.hepburn_name.clone(),
        english: record.english.clone(),
        image: record.image_url.clone(),
        origin_elements: origin
            .map(|o| o.elements.iter().skip(1).cloned().collect())
            .unwrap_or_default(),
        description: origin
            .map(|o| clean_footnotes(&o.description))
            .unwrap_or_default(),
        category,
        category_icon: info.and_then(|i| i.icon_url.clone()),
    }
}
