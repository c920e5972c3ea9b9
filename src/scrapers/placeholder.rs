//! Detection of lazy-loading placeholder images.
//!
//! Sites that defer image loading to JavaScript often put a spacer in `src`
//! and the real URL in a `data-*` attribute. Such URLs are recognized by
//! substring markers; the marker set is data, so sources can add their own
//! through configuration.

/// Markers recognized by [`PlaceholderDetector::default`].
pub const DEFAULT_MARKERS: &[&str] = &[
    "data:image/svg+xml",
    "placeholder",
    "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP",
    "/images/spacer.",
    "blank.gif",
    "transparent.png",
    "1x1.png",
];

/// Classifies image URLs as genuine or placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderDetector {
    // lowercased
    markers: Vec<String>,
}

impl Default for PlaceholderDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MARKERS.iter().copied())
    }
}

impl PlaceholderDetector {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut detector = Self {
            markers: Vec::new(),
        };
        detector.extend(markers);
        detector
    }

    /// Adds markers. Blank and duplicate markers are ignored.
    pub fn extend<I, S>(&mut self, markers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for marker in markers {
            let marker = marker.as_ref().trim().to_lowercase();
            if !marker.is_empty() && !self.markers.contains(&marker) {
                self.markers.push(marker);
            }
        }
    }

    /// True if `url` is absent, blank, or contains any marker (case-insensitive).
    pub fn is_placeholder(&self, url: Option<&str>) -> bool {
        let url = match url.map(str::trim) {
            Some(u) if !u.is_empty() => u.to_lowercase(),
            _ => return true,
        };
        self.markers.iter().any(|marker| url.contains(marker.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_blank_are_placeholders() {
        let detector = PlaceholderDetector::default();
        assert!(detector.is_placeholder(None));
        assert!(detector.is_placeholder(Some("")));
        assert!(detector.is_placeholder(Some("  ")));
    }

    #[test]
    fn test_default_markers() {
        let detector = PlaceholderDetector::default();
        assert!(detector.is_placeholder(Some("data:image/svg+xml;charset=utf-8,%3Csvg%3E")));
        assert!(detector.is_placeholder(Some("https://vesti.kg/images/Placeholder-news.jpg")));
        assert!(detector.is_placeholder(Some(
            "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7"
        )));
        assert!(detector.is_placeholder(Some("/templates/vesti/images/spacer.gif")));
        assert!(detector.is_placeholder(Some("https://cdn.example/BLANK.GIF")));
        assert!(detector.is_placeholder(Some("/static/transparent.png")));
        assert!(detector.is_placeholder(Some("/static/1x1.png")));
    }

    #[test]
    fn test_real_images_pass() {
        let detector = PlaceholderDetector::default();
        assert!(!detector.is_placeholder(Some("https://cdn.example/real.jpg")));
        assert!(!detector.is_placeholder(Some("/images/2025/05/parliament.webp")));
        assert!(!detector.is_placeholder(Some("data:image/jpeg;base64,/9j/4AAQ")));
    }

    #[test]
    fn test_extend_adds_markers_case_insensitively() {
        let mut detector = PlaceholderDetector::default();
        assert!(!detector.is_placeholder(Some("https://cdn.example/lazy-stub.jpg")));

        detector.extend(["Lazy-Stub", "", "blank.gif"]);
        assert!(detector.is_placeholder(Some("https://cdn.example/lazy-stub.jpg")));
        assert_eq!(detector.markers.len(), DEFAULT_MARKERS.len() + 1);
    }

    #[test]
    fn test_empty_marker_set_only_rejects_absent() {
        let detector = PlaceholderDetector::new(Vec::<String>::new());
        assert!(detector.is_placeholder(None));
        assert!(!detector.is_placeholder(Some("data:image/svg+xml;base64,AAAA")));
    }
}
