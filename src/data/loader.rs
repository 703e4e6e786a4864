//! Source loading for the three deck inputs.
//!
//! Each source is either a local path or an `http(s)://` URL. All three
//! are read concurrently and the load proceeds only once every one of them
//! has been read and parsed; any failure aborts the whole load.

use std::fmt;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{Card, Dataset, build_cards};
use crate::error::DataError;

/// Location of one JSON source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataSource {
    /// Local file.
    Path(PathBuf),
    /// Remote resource fetched with HTTP GET.
    Url(String),
}

impl DataSource {
    /// Reads the raw text of the source.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Read`] or [`DataError::Fetch`] on failure.
    pub async fn read_text(&self, client: &reqwest::Client) -> Result<String, DataError> {
        match self {
            Self::Path(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|error| DataError::Read {
                        source_name: self.to_string(),
                        error,
                    })
            }
            Self::Url(url) => {
                let fetch_err = |e: reqwest::Error| DataError::Fetch {
                    source_name: url.clone(),
                    message: e.to_string(),
                };
                let response = client
                    .get(url)
                    .send()
                    .await
                    .map_err(fetch_err)?
                    .error_for_status()
                    .map_err(fetch_err)?;
                response.text().await.map_err(fetch_err)
            }
        }
    }

    /// Reads and parses the source as JSON.
    ///
    /// # Errors
    ///
    /// Returns the read error, or [`DataError::Parse`] if the text is not
    /// valid JSON of type `T`.
    pub async fn load_json<T: DeserializeOwned>(
        &self,
        client: &reqwest::Client,
    ) -> Result<T, DataError> {
        let text = self.read_text(client).await?;
        serde_json::from_str(&text).map_err(|error| DataError::Parse {
            source_name: self.to_string(),
            error,
        })
    }
}

impl From<String> for DataSource {
    fn from(value: String) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value)
        } else {
            Self::Path(PathBuf::from(value))
        }
    }
}

impl From<&str> for DataSource {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<DataSource> for String {
    fn from(value: DataSource) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// The three deck sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSources {
    /// Catalog array.
    pub catalog: DataSource,
    /// Origin map keyed by identifier.
    pub origins: DataSource,
    /// Category map keyed by tag.
    pub categories: DataSource,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            catalog: "pokemon_base_0001_1025_with_tcg_types.json".into(),
            origins: "name_origins_0001_1025_cleaned.json".into(),
            categories: "tcg_types_info.json".into(),
        }
    }
}

impl DataSources {
    /// Resolves relative local paths against `base`. URLs are left as-is.
    #[must_use]
    pub fn relative_to(mut self, base: &std::path::Path) -> Self {
        for source in [&mut self.catalog, &mut self.origins, &mut self.categories] {
            if let DataSource::Path(path) = source
                && path.is_relative()
            {
                *path = base.join(&*path);
            }
        }
        self
    }
}

/// Loads and parses all three sources concurrently.
///
/// # Errors
///
/// Returns the first [`DataError`] encountered; no partial dataset is
/// produced.
pub async fn load_dataset(
    sources: &DataSources,
    client: &reqwest::Client,
) -> Result<Dataset, DataError> {
    tracing::debug!(
        catalog = %sources.catalog,
        origins = %sources.origins,
        categories = %sources.categories,
        "loading deck sources"
    );
    let (catalog, origins, categories) = tokio::try_join!(
        sources.catalog.load_json(client),
        sources.origins.load_json(client),
        sources.categories.load_json(client),
    )?;
    Ok(Dataset {
        catalog,
        origins,
        categories,
    })
}

/// Loads the sources and joins them into cards.
///
/// # Errors
///
/// Returns any [`DataError`] from [`load_dataset`].
pub async fn load_cards(
    sources: &DataSources,
    client: &reqwest::Client,
) -> Result<Vec<Card>, DataError> {
    let dataset = load_dataset(sources, client).await?;
    let cards = build_cards(&dataset);
    tracing::info!(cards = cards.len(), "deck data loaded");
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const CATALOG: &str = r#"[
        {"ndex": 1, "kanaName": "フシギダネ", "hepburnName": "Fushigidane",
         "publishedName": "Fushigidane", "english": "Bulbasaur",
         "imageUrl": "images/0001.png", "tcg_type": "Grass"},
        {"ndex": 4, "kanaName": "ヒトカゲ", "hepburnName": "Hitokage",
         "publishedName": "Hitokage", "english": "Charmander",
         "imageUrl": "images/0004.png", "tcg_type": "Fire"}
    ]"#;
    const ORIGINS: &str = r#"{
        "1": {"nameOriginElements": ["フシギダネ", "不思議", "種"],
              "nameOriginDescription": "Strange seed."}
    }"#;
    const CATEGORIES: &str = r##"{
        "Grass": {"name": "Grass", "color": "#7db808", "icon_url": "icons/grass.png"},
        "Colorless": {"name": "Colorless", "color": null, "icon_url": "icons/colorless.png"}
    }"##;

    fn write_sources(dir: &Path, categories: &str) -> DataSources {
        std::fs::write(dir.join("catalog.json"), CATALOG).unwrap();
        std::fs::write(dir.join("origins.json"), ORIGINS).unwrap();
        std::fs::write(dir.join("categories.json"), categories).unwrap();
        DataSources {
            catalog: "catalog.json".into(),
            origins: "origins.json".into(),
            categories: "categories.json".into(),
        }
        .relative_to(dir)
    }

    #[test]
    fn source_kind_from_string() {
        assert_eq!(
            DataSource::from("https://example.com/a.json"),
            DataSource::Url("https://example.com/a.json".to_string())
        );
        assert_eq!(
            DataSource::from("data/a.json"),
            DataSource::Path(PathBuf::from("data/a.json"))
        );
    }

    #[test]
    fn relative_to_leaves_urls_and_absolute_paths() {
        let sources = DataSources {
            catalog: "http://x/c.json".into(),
            origins: "/abs/o.json".into(),
            categories: "rel/t.json".into(),
        }
        .relative_to(Path::new("/base"));
        assert_eq!(sources.catalog, DataSource::Url("http://x/c.json".into()));
        assert_eq!(sources.origins, DataSource::Path("/abs/o.json".into()));
        assert_eq!(sources.categories, DataSource::Path("/base/rel/t.json".into()));
    }

    #[tokio::test]
    async fn loads_and_joins_local_sources() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), CATEGORIES);
        let cards = load_cards(&sources, &reqwest::Client::new()).await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].origin_elements, vec!["不思議", "種"]);
        assert_eq!(cards[1].category, "Fire");
        assert_eq!(cards[1].category_icon.as_deref(), Some("icons/colorless.png"));
    }

    #[tokio::test]
    async fn empty_category_map_renders_with_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), "{}");
        let cards = load_cards(&sources, &reqwest::Client::new()).await.unwrap();
        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|c| c.category_icon.is_none()));
    }

    #[tokio::test]
    async fn missing_file_fails_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut sources = write_sources(dir.path(), CATEGORIES);
        sources.origins = dir.path().join("nope.json").to_string_lossy().as_ref().into();
        let err = load_dataset(&sources, &reqwest::Client::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Read { .. }));
    }

    #[tokio::test]
    async fn malformed_json_fails_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), "[not json");
        let err = load_dataset(&sources, &reqwest::Client::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }));
        assert!(err.to_string().contains("categories.json"));
    }

    #[test]
    fn sources_deserialize_from_yaml_strings() {
        let yaml = "catalog: https://cdn.example/catalog.json\norigins: o.json\n";
        let sources: DataSources = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(sources.catalog, DataSource::Url(_)));
        assert_eq!(sources.origins, DataSource::Path("o.json".into()));
        assert_eq!(sources.categories, DataSources::default().categories);
    }
}
