//! Source configuration: selectors and URLs for each listing page.
//!
//! Sources are described in YAML with camelCase keys:
//!
//! ```yaml
//! placeholderMarkers: ["lazy-stub.gif"]   # optional, extends the defaults
//! sources:
//!   rt:
//!     listUrl: https://www.rt.com/news/
//!     baseUrl: https://www.rt.com
//!     itemSelector: li.js-listing__item
//!     titleSelector: .list-card__content--title a
//!     descriptionSelector: .list-card__content--summary a
//!     linkSelector: .list-card__content--title a
//!     linkAttribute: href
//!     imageSelector: picture img.media__item
//!     imageAttribute: data-src
//!     strategy: cover-lazy-load            # optional
//!     trailingPhrases: ["Read more"]       # optional
//! ```
//!
//! The built-in set (`config/sources.yaml`) is compiled into the binary and
//! used when no `--config` file is given.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::error::ConfigError;
use crate::scrapers::query::SelectorChain;
use crate::scrapers::strategy::Strategy;

const BUILTIN_SOURCES_YAML: &str = include_str!("../config/sources.yaml");

/// Selectors and URLs for one listing source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    /// Listing page to fetch.
    pub list_url: String,
    /// Base for relative links and images. A trailing `/` is optional.
    pub base_url: String,
    /// Matches each repeated listing entry.
    pub item_selector: String,
    pub title_selector: String,
    pub description_selector: String,
    pub link_selector: String,
    /// Attribute holding the article URL, usually `href`.
    pub link_attribute: String,
    pub image_selector: String,
    pub image_attribute: String,
    /// Carried for sources whose markup has a second image slot. None of the
    /// built-in strategies reads it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_image_selector: Option<String>,
    /// Replaces the strategy's default trailing phrase list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing_phrases: Option<Vec<String>>,
    /// Wires a strategy explicitly instead of relying on built-in wiring by id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
}

/// Compiled selectors of one [`SourceConfig`].
#[derive(Debug, Clone)]
pub struct SourceSelectors {
    pub item: SelectorChain,
    pub title: SelectorChain,
    pub description: SelectorChain,
    pub link: SelectorChain,
    pub image: SelectorChain,
}

impl SourceConfig {
    /// Checks required fields and URLs, then compiles every selector.
    pub fn compile(&self, source_id: &str) -> Result<SourceSelectors, ConfigError> {
        let required = [
            ("listUrl", &self.list_url),
            ("baseUrl", &self.base_url),
            ("itemSelector", &self.item_selector),
            ("titleSelector", &self.title_selector),
            ("descriptionSelector", &self.description_selector),
            ("linkSelector", &self.link_selector),
            ("linkAttribute", &self.link_attribute),
            ("imageSelector", &self.image_selector),
            ("imageAttribute", &self.image_attribute),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    source_id: source_id.to_string(),
                    field,
                });
            }
        }

        check_http_url(source_id, "listUrl", &self.list_url)?;
        check_http_url(source_id, "baseUrl", &self.base_url)?;

        let compile = |field: &'static str, raw: &str| {
            SelectorChain::parse(raw).ok_or_else(|| ConfigError::InvalidSelector {
                source_id: source_id.to_string(),
                field,
                selector: raw.to_string(),
            })
        };

        // validated only; no strategy reads it
        if let Some(raw) = self.alternative_image_selector.as_deref().filter(|raw| !raw.trim().is_empty()) {
            compile("alternativeImageSelector", raw)?;
        }

        Ok(SourceSelectors {
            item: compile("itemSelector", &self.item_selector)?,
            title: compile("titleSelector", &self.title_selector)?,
            description: compile("descriptionSelector", &self.description_selector)?,
            link: compile("linkSelector", &self.link_selector)?,
            image: compile("imageSelector", &self.image_selector)?,
        })
    }
}

fn check_http_url(source_id: &str, field: &'static str, raw: &str) -> Result<(), ConfigError> {
    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            source_id: source_id.to_string(),
            field,
            url: raw.to_string(),
        }),
    }
}

/// A whole sources file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcesFile {
    /// Extra placeholder markers on top of the defaults.
    #[serde(default)]
    pub placeholder_markers: Vec<String>,
    #[serde(default)]
    pub sources: BTreeMap<String, SourceConfig>,
}

impl SourcesFile {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// The sources compiled into the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml_str(BUILTIN_SOURCES_YAML)
    }

    #[instrument(level = "info")]
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_string(),
            error,
        })?;
        let file = Self::from_yaml_str(&yaml)?;
        debug!(sources = file.sources.len(), "Loaded sources file");
        Ok(file)
    }
}
