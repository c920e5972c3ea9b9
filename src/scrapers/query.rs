//! Node queries: find descendants by selector and read their text or attributes.
//!
//! A configured selector such as `"h2 a, .item-title a, .title a"` is held as a
//! [`SelectorChain`]. Selecting listing items uses the whole list as one CSS
//! union, so every matching node comes back in document order. Field lookups
//! ([`find_text`], [`find_attribute`]) instead try the comma-separated
//! alternatives one at a time: the first alternative that matches anything
//! wins, and its first node in document order is used.
//!
//! A selector that matches nothing is routine. It produces an empty string or
//! `None`, never an error.

use once_cell::sync::Lazy;
use scraper::html::Select;
use scraper::{ElementRef, Html, Selector};

use crate::utils::normalize_whitespace;

static NOSCRIPT: Lazy<Selector> = Lazy::new(|| Selector::parse("noscript").unwrap());

/// A compiled selector list with ordered alternatives.
#[derive(Debug, Clone)]
pub struct SelectorChain {
    raw: String,
    union: Selector,
    alternatives: Vec<Selector>,
}

impl SelectorChain {
    /// Compiles `raw`. Returns `None` if it is blank or any alternative fails to parse.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let union = Selector::parse(raw).ok()?;
        let alternatives = split_alternatives(raw)
            .into_iter()
            .map(|alt| Selector::parse(alt).ok())
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            raw: raw.to_string(),
            union,
            alternatives,
        })
    }

    /// The selector text as configured (trimmed).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Every node in `document` matching any alternative, in document order.
    pub fn select_all<'a, 'b>(&'b self, document: &'a Html) -> Select<'a, 'b> {
        document.select(&self.union)
    }

    /// First descendant of `node` matched by the first alternative that matches anything.
    pub fn first<'a>(&self, node: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.alternatives
            .iter()
            .find_map(|selector| node.select(selector).next())
    }
}

/// Splits a selector list on top-level commas.
///
/// Commas inside brackets, parentheses or quotes (`a[title="x,y"]`,
/// `:is(h2, h3)`) do not split.
fn split_alternatives(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in raw.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(raw[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(raw[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

/// Whitespace-normalized text of the first match, or `""` if nothing matches.
pub fn find_text(node: ElementRef<'_>, selector: &SelectorChain) -> String {
    selector
        .first(node)
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        .unwrap_or_default()
}

/// Trimmed value of `attribute` on the first match.
///
/// `None` if nothing matches or the first match has the attribute unset or blank.
/// Later matches are not consulted.
pub fn find_attribute(
    node: ElementRef<'_>,
    selector: &SelectorChain,
    attribute: &str,
) -> Option<String> {
    selector
        .first(node)
        .and_then(|el| el.value().attr(attribute))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Like [`find_attribute`], but looks inside `<noscript>` descendants only.
///
/// With scripting enabled the HTML parser keeps `<noscript>` bodies as raw
/// text, so when the selector finds no element inside a `<noscript>` its text
/// is parsed as a fragment and queried instead.
pub fn find_noscript_attribute(
    node: ElementRef<'_>,
    selector: &SelectorChain,
    attribute: &str,
) -> Option<String> {
    node.select(&NOSCRIPT).find_map(|noscript| {
        if let Some(value) = find_attribute(noscript, selector, attribute) {
            return Some(value);
        }
        let markup = noscript.text().collect::<String>();
        if markup.trim().is_empty() {
            return None;
        }
        let fragment = Html::parse_fragment(&markup);
        find_attribute(fragment.root_element(), selector, attribute)
    })
}
