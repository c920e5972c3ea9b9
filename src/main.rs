//! # Listing News
//!
//! Pulls article cards (title, image, teaser, link) out of the listing pages
//! of news sites whose markup has nothing in common, and writes them out as
//! JSON.
//!
//! ## Usage
//!
//! ```sh
//! listing_news rt vesti azattyk -j ./json
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: load source selectors (built-in or `--config` YAML)
//! 2. **Fetching**: download each listing page, retrying with backoff
//! 3. **Extraction**: run the source's strategy over the page
//! 4. **Output**: write one JSON file per source, or print to stdout
//!
//! Sources are fetched concurrently; extraction itself is synchronous and
//! reads the registry without locking.

use clap::Parser;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod fetch;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use error::ExtractError;
use fetch::{FetchAsync, FetchOptions, HttpFetcher, RetryFetch, fetch_html};
use models::ListingPage;
use outputs::json;
use scrapers::registry::{Registry, normalize_source_id};
use utils::{ensure_writable_dir, truncate_for_log};

const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let registry = match args.config.as_deref() {
        Some(path) => Registry::from_yaml_file(path)?,
        None => Registry::builtin()?,
    };

    if args.list_sources {
        for id in registry.source_ids() {
            let strategy = registry.strategy(&id).map(|s| s.name()).unwrap_or("unsupported");
            println!("{id}\t{strategy}");
        }
        return Ok(());
    }

    let sources: Vec<String> = if args.sources.is_empty() {
        registry.source_ids()
    } else {
        args.sources.iter().map(|s| normalize_source_id(s)).unique().collect()
    };

    if let Some(dir) = args.json_output_dir.as_deref() {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Fetch (or read) and extract ----
    let results: Vec<(String, Result<Option<ListingPage>, ExtractError>)> = match args.html_file.as_deref() {
        Some(path) => {
            let [source] = sources.as_slice() else {
                return Err("--html-file needs exactly one source id".into());
            };
            let html = tokio::fs::read_to_string(path).await?;
            info!(%path, bytes = html.len(), "Read saved listing page");
            let result = registry
                .extract(source, &html)
                .map(|articles| Some(ListingPage::new(source.clone(), articles)));
            vec![(source.clone(), result)]
        }
        None => {
            let opts = FetchOptions {
                timeout: Duration::from_secs(args.timeout_secs),
                user_agent: args.user_agent.clone().unwrap_or_else(|| fetch::DEFAULT_USER_AGENT.to_string()),
                ..FetchOptions::default()
            };
            let fetcher = RetryFetch::new(HttpFetcher::new(&opts)?, args.retries, RETRY_BASE_DELAY);
            let registry = &registry;
            let fetcher = &fetcher;

            stream::iter(sources.iter().cloned())
                .map(|source| async move {
                    let result = run_source(registry, fetcher, &source).await;
                    (source, result)
                })
                .buffer_unordered(args.concurrency.max(1))
                .collect()
                .await
        }
    };

    // ---- Output ----
    let mut pages = Vec::new();
    let mut rejected = Vec::new();
    let mut failed = 0usize;
    for (source, result) in results.into_iter().sorted_by(|a, b| a.0.cmp(&b.0)) {
        match result {
            Ok(Some(page)) => pages.push(page),
            Ok(None) => failed += 1,
            Err(e) => {
                error!(%source, error = %e, "Source rejected");
                rejected.push(e);
            }
        }
    }

    match args.json_output_dir.as_deref() {
        Some(dir) => {
            for page in &pages {
                if let Err(e) = json::write_listing(page, dir).await {
                    error!(source = %page.source, error = %e, "Failed to write listing JSON");
                }
            }
        }
        None => println!("{}", json::to_pretty_json(&pages)?),
    }

    let (unknown, unsupported) = rejection_counts(&rejected);
    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        sources = sources.len(),
        extracted = pages.len(),
        articles = pages.iter().map(|p| p.count).sum::<usize>(),
        failed,
        unknown,
        unsupported,
        "Execution complete"
    );

    if !rejected.is_empty() {
        let msg = rejected.iter().map(ToString::to_string).join("; ");
        return Err(msg.into());
    }
    Ok(())
}

/// Counts rejected sources as (unknown, configured but unsupported).
fn rejection_counts(rejected: &[ExtractError]) -> (usize, usize) {
    let unknown = rejected.iter().filter(|e| e.is_configuration()).count();
    let unsupported = rejected.iter().filter(|e| e.is_unsupported()).count();
    (unknown, unsupported)
}

/// Fetch one source's listing page and extract its articles.
///
/// Configuration problems are checked before any request is made and come
/// back as `Err`. A failed or empty fetch is logged and gives `Ok(None)`.
#[instrument(level = "info", skip(registry, fetcher))]
async fn run_source<F: FetchAsync>(
    registry: &Registry,
    fetcher: &F,
    source_id: &str,
) -> Result<Option<ListingPage>, ExtractError> {
    let config = registry.config(source_id)?;
    registry.strategy(source_id)?;

    let Some(html) = fetch_html(fetcher, &config.list_url).await else {
        error!(
            url = %config.list_url,
            "Failed to fetch listing page. The website might be unavailable or blocking requests"
        );
        return Ok(None);
    };
    if html.trim().is_empty() {
        warn!(url = %config.list_url, "Empty response received");
        return Ok(None);
    }
    debug!(preview = %truncate_for_log(&html, 200), "Fetched listing page");

    let articles = registry.extract(source_id, &html)?;
    Ok(Some(ListingPage::new(source_id, articles)))
}
