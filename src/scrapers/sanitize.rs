//! Removal of trailing "read more" boilerplate from teaser text.

use regex::Regex;
use tracing::warn;

/// A compiled list of trailing phrases to strip.
///
/// Matching is case-insensitive and Unicode-aware, so Cyrillic phrases such
/// as `Подробнее` match `ПОДРОБНЕЕ` too.
#[derive(Debug, Clone)]
pub struct BoilerplateFilter {
    pattern: Option<Regex>,
}

impl BoilerplateFilter {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives: Vec<String> = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .map(|p| regex::escape(&p))
            .collect();
        if alternatives.is_empty() {
            return Self { pattern: None };
        }

        let source = format!(r"(?iu)\s*(?:{})\s*$", alternatives.join("|"));
        let pattern = match Regex::new(&source) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(error = %e, "Failed to compile boilerplate pattern; descriptions will only be trimmed");
                None
            }
        };
        Self { pattern }
    }

    /// Trims `text`, removes one trailing phrase if present, and trims again.
    pub fn apply(&self, text: &str) -> String {
        let text = text.trim();
        match &self.pattern {
            Some(re) => re.replace(text, "").trim().to_string(),
            None => text.to_string(),
        }
    }
}
