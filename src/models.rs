//! Data models for extracted listing entries.
//!
//! - [`ArticleRecord`]: one article card pulled out of a listing page
//! - [`ListingPage`]: every record extracted from one source in one run
//!
//! Both serialize with camelCase keys, which is the shape the front end reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single article card extracted from a listing page.
///
/// A record always carries a non-empty `title` and an absolute `source_url`;
/// items missing either are dropped during extraction instead of being
/// turned into records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    /// The headline as shown on the listing page.
    pub title: String,
    /// Resolved image URL, `None` when no usable image was found.
    pub image_url: Option<String>,
    /// Teaser text with trailing "read more" boilerplate removed. May be empty.
    pub description: String,
    /// Absolute URL of the full article.
    pub source_url: String,
}

/// The records extracted from one source, in document order.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    /// Normalized source id, e.g. `"rt"`.
    pub source: String,
    /// Number of records in `articles`.
    pub count: usize,
    /// When the listing page was fetched (or read from disk).
    pub fetched_at: DateTime<Utc>,
    pub articles: Vec<ArticleRecord>,
}

impl ListingPage {
    pub fn new(source: impl Into<String>, articles: Vec<ArticleRecord>) -> Self {
        Self {
            source: source.into(),
            count: articles.len(),
            fetched_at: Utc::now(),
            articles,
        }
    }
}
