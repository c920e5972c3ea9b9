//! Command-line interface definitions for Listing News.
//!
//! All options can be provided via command-line flags or environment variables.

use clap::Parser;

/// Command-line arguments for the Listing News application.
///
/// # Examples
///
/// ```sh
/// # Every configured source, printed to stdout
/// listing_news
///
/// # Two sources, written to ./json/<date>/<source>.json
/// listing_news rt vesti -j ./json
///
/// # Parse a saved page instead of fetching it
/// listing_news azattyk --html-file ./azattyk.html
///
/// # Custom sources file
/// listing_news --config ./sources.yaml --list-sources
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Source ids to extract (case-insensitive). Defaults to every configured source.
    pub sources: Vec<String>,

    /// Path to a sources YAML file; replaces the built-in sources
    #[arg(short, long, env = "LISTING_NEWS_CONFIG")]
    pub config: Option<String>,

    /// Output directory for JSON files; prints to stdout when omitted
    #[arg(short, long, env = "LISTING_NEWS_JSON_DIR")]
    pub json_output_dir: Option<String>,

    /// Parse this saved HTML file instead of fetching (exactly one source required)
    #[arg(long)]
    pub html_file: Option<String>,

    /// Print the configured source ids and exit
    #[arg(short, long)]
    pub list_sources: bool,

    /// Per-request timeout in seconds
    #[arg(long, env = "LISTING_NEWS_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Retries after a failed fetch
    #[arg(long, env = "LISTING_NEWS_RETRIES", default_value_t = 2)]
    pub retries: usize,

    /// User-Agent header for fetches
    #[arg(long, env = "LISTING_NEWS_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Sources fetched at the same time
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,
}
