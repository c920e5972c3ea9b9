//! Utility functions for string handling and file system checks.
//!
//! - Whitespace normalization for text pulled out of markup
//! - String truncation for logging page bodies
//! - File system validation for output directories

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Collapse runs of whitespace into single spaces and trim the ends.
///
/// Text nodes in listing markup carry indentation and line breaks from the
/// page template; this flattens them the way a browser renders them.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then writes and immediately
/// deletes a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
