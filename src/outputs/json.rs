//! JSON output for extracted listings.
//!
//! Each source's [`ListingPage`] is written to its own file under a
//! directory named after the local date, so repeated runs on the same day
//! overwrite the previous snapshot for that source.

use crate::models::ListingPage;
use chrono::{Local, NaiveDate};
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Path of the file a page is written to: `{json_output_dir}/{date}/{source}.json`.
pub fn listing_path(json_output_dir: &str, date: NaiveDate, source: &str) -> PathBuf {
    PathBuf::from(json_output_dir)
        .join(date.to_string())
        .join(format!("{source}.json"))
}

/// Write a [`ListingPage`] under today's date directory.
///
/// Creates the date directory if needed and returns the written path.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, source = %page.source))]
pub async fn write_listing(
    page: &ListingPage,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(page)?;
    let path = listing_path(json_output_dir, Local::now().date_naive(), &page.source);

    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), count = page.count, "Wrote listing JSON");
    Ok(path)
}

/// Pretty JSON array of pages, for printing to stdout.
pub fn to_pretty_json(pages: &[ListingPage]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(pages)
}
