//! Source registry: maps source ids to their configuration and strategy.
//!
//! Configuration and strategies are registered separately, so a source can
//! be configured without anything wired to extract it. [`Registry::extract`]
//! checks for both and reports which one is missing.
//!
//! Source ids are case-insensitive. They are trimmed and lowercased once, on
//! the way in, for registration and lookup alike.
//!
//! The registry is read-only after construction and may be shared across
//! threads or tasks that extract different sources at the same time.

use std::collections::HashMap;

use itertools::Itertools;
use tracing::{info, instrument, warn};

use crate::config::{SourceConfig, SourceSelectors, SourcesFile};
use crate::error::{ConfigError, ExtractError};
use crate::models::ArticleRecord;
use crate::scrapers::placeholder::PlaceholderDetector;
use crate::scrapers::sanitize::BoilerplateFilter;
use crate::scrapers::strategy::{ExtractContext, Strategy};

/// Trims and lowercases a source id.
pub fn normalize_source_id(source_id: &str) -> String {
    source_id.trim().to_lowercase()
}

#[derive(Debug, Clone)]
struct RegisteredSource {
    config: SourceConfig,
    selectors: SourceSelectors,
}

/// Registered sources, their strategies and the shared placeholder markers.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    sources: HashMap<String, RegisteredSource>,
    strategies: HashMap<String, Strategy>,
    placeholders: PlaceholderDetector,
}

impl Registry {
    /// An empty registry with the default placeholder markers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the sources compiled into the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_sources_file(SourcesFile::builtin()?)
    }

    /// Registry holding the sources of a YAML file on disk.
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        Self::from_sources_file(SourcesFile::load(path)?)
    }

    /// Registers every source of `file`.
    ///
    /// A source gets the strategy it names explicitly, else the built-in
    /// wiring for its id, else none (it stays configured but unsupported).
    /// Two ids that normalize to the same key are rejected.
    pub fn from_sources_file(file: SourcesFile) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        registry.extend_placeholder_markers(&file.placeholder_markers);

        let mut seen: HashMap<String, String> = HashMap::new();
        for (source_id, config) in file.sources {
            let key = normalize_source_id(&source_id);
            if let Some(first) = seen.insert(key.clone(), source_id.clone()) {
                return Err(ConfigError::DuplicateSourceId {
                    first,
                    second: source_id,
                });
            }
            let strategy = config.strategy.or_else(|| Strategy::builtin_for(&key));
            registry.register_source(&source_id, config)?;
            match strategy {
                Some(strategy) => registry.register_strategy(&key, strategy),
                None => warn!(source = %key, "No extraction strategy wired for configured source"),
            }
        }

        info!(
            sources = registry.sources.len(),
            strategies = registry.strategies.len(),
            "Source registry ready"
        );
        Ok(registry)
    }

    /// Validates `config`, compiles its selectors and stores it under `source_id`.
    pub fn register_source(&mut self, source_id: &str, config: SourceConfig) -> Result<(), ConfigError> {
        let key = normalize_source_id(source_id);
        if key.is_empty() {
            return Err(ConfigError::BlankSourceId);
        }
        let selectors = config.compile(&key)?;
        if self
            .sources
            .insert(key.clone(), RegisteredSource { config, selectors })
            .is_some()
        {
            warn!(source = %key, "Source registered twice; keeping the later configuration");
        }
        Ok(())
    }

    /// Wires `strategy` to `source_id`. The source need not be configured yet.
    pub fn register_strategy(&mut self, source_id: &str, strategy: Strategy) {
        self.strategies.insert(normalize_source_id(source_id), strategy);
    }

    /// Adds placeholder markers shared by all sources.
    pub fn extend_placeholder_markers<I, S>(&mut self, markers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.placeholders.extend(markers);
    }

    /// Configured source ids, sorted.
    pub fn source_ids(&self) -> Vec<String> {
        self.sources.keys().cloned().sorted().collect()
    }

    /// The configuration of `source_id`.
    pub fn config(&self, source_id: &str) -> Result<&SourceConfig, ExtractError> {
        self.lookup(&normalize_source_id(source_id))
            .map(|source| &source.config)
    }

    /// The strategy wired to `source_id`, after checking the source is configured.
    pub fn strategy(&self, source_id: &str) -> Result<Strategy, ExtractError> {
        let key = normalize_source_id(source_id);
        self.lookup(&key)?;
        self.strategy_for(&key)
    }

    /// Extracts article records from `html` using the source's strategy.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::Configuration`] if no configuration is registered for `source_id`
    /// - [`ExtractError::UnsupportedSource`] if no strategy is wired to it
    ///
    /// An empty document, or one where nothing matches, is not an error and
    /// yields an empty list.
    #[instrument(level = "info", skip(self, html), fields(bytes = html.len()))]
    pub fn extract(&self, source_id: &str, html: &str) -> Result<Vec<ArticleRecord>, ExtractError> {
        let key = normalize_source_id(source_id);
        let source = self.lookup(&key)?;
        let strategy = self.strategy_for(&key)?;

        let phrases: Vec<&str> = match &source.config.trailing_phrases {
            Some(phrases) => phrases.iter().map(String::as_str).collect(),
            None => strategy.default_phrases().to_vec(),
        };
        let boilerplate = BoilerplateFilter::new(phrases);
        let ctx = ExtractContext {
            config: &source.config,
            selectors: &source.selectors,
            boilerplate: &boilerplate,
            placeholders: &self.placeholders,
        };

        let records = strategy.extract(html, &ctx);
        info!(source = %key, strategy = strategy.name(), count = records.len(), "Extracted articles");
        Ok(records)
    }

    fn lookup(&self, key: &str) -> Result<&RegisteredSource, ExtractError> {
        self.sources
            .get(key)
            .ok_or_else(|| ExtractError::Configuration {
                source_id: key.to_string(),
                available: self.source_ids().join(", "),
            })
    }

    fn strategy_for(&self, key: &str) -> Result<Strategy, ExtractError> {
        self.strategies
            .get(key)
            .copied()
            .ok_or_else(|| ExtractError::UnsupportedSource {
                source_id: key.to_string(),
            })
    }
}
