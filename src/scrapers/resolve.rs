//! Resolution of relative article and image URLs against a source's base URL.
//!
//! Listing pages mix absolute links, protocol-relative CDN links and
//! site-relative paths. Resolution is plain string work: no normalization of
//! `..` segments or query strings, so the output stays recognizable next to
//! the markup it came from.

/// Resolves `raw` against `base_url`.
///
/// - `None` or blank input → `None`
/// - `http://…` / `https://…` → unchanged. The scheme is matched
///   ASCII case-insensitively, so `HTTPS://host/a` is also left as is
///   rather than joined onto `base_url`.
/// - `//host/path` → `https://host/path`
/// - anything else → `base_url` without trailing `/`, `/`, `raw` without leading `/`
///
/// Resolving an already-resolved URL again returns it unchanged as long as
/// `base_url` is itself absolute, which source configuration guarantees.
pub fn resolve(raw: Option<&str>, base_url: &str) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if has_http_scheme(raw) {
        return Some(raw.to_string());
    }
    if raw.starts_with("//") {
        return Some(format!("https:{raw}"));
    }

    let base = base_url.trim_end_matches('/');
    let path = raw.trim_start_matches('/');
    Some(format!("{base}/{path}"))
}

fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
