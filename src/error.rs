//! Error types for source configuration and extraction.
//!
//! Only two things can go wrong once a registry is built, and both are the
//! caller's fault: asking for a source nobody configured, or asking for a
//! source whose configuration exists but has no extraction strategy wired to
//! it. Everything else an HTML page can throw at the extractor degrades to
//! empty fields or skipped items and is not an error.
//!
//! Problems with the configuration itself (bad YAML, a selector that does not
//! compile) are reported by [`ConfigError`] while the registry is being built.

use thiserror::Error;

/// Failure of [`Registry::extract`](crate::scrapers::registry::Registry::extract).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// No `SourceConfig` is registered under the (normalized) id.
    #[error("configuration for source '{source_id}' not found; available sources: {available}")]
    Configuration {
        source_id: String,
        available: String,
    },

    /// A `SourceConfig` exists but no strategy is wired to it.
    #[error("parser for source '{source_id}' is not implemented")]
    UnsupportedSource { source_id: String },
}

impl ExtractError {
    /// Returns true if the source id is unknown.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ExtractError::Configuration { .. })
    }

    /// Returns true if the source is configured but has no strategy.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ExtractError::UnsupportedSource { .. })
    }
}

/// Failure while loading or registering source configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read sources file {path}: {error}")]
    Io {
        path: String,
        #[source]
        error: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("source id must not be blank")]
    BlankSourceId,

    #[error("source ids {first:?} and {second:?} differ only in case")]
    DuplicateSourceId { first: String, second: String },

    #[error("source '{source_id}': required field '{field}' is empty")]
    MissingField {
        source_id: String,
        field: &'static str,
    },

    #[error("source '{source_id}': {field} is not a valid selector: {selector:?}")]
    InvalidSelector {
        source_id: String,
        field: &'static str,
        selector: String,
    },

    #[error("source '{source_id}': {field} must be an absolute http(s) URL, got {url:?}")]
    InvalidUrl {
        source_id: String,
        field: &'static str,
        url: String,
    },
}
