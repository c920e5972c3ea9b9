//! Fetching listing pages over HTTP with exponential backoff retry logic.
//!
//! Extraction never touches the network. This module is the collaborator
//! that hands it raw HTML, and it reports failure as absence: callers get
//! `None` from [`fetch_html`] instead of an error to propagate.
//!
//! # Architecture
//!
//! - [`FetchAsync`]: core trait for "give me the body at this URL"
//! - [`HttpFetcher`]: `reqwest`-backed implementation
//! - [`RetryFetch`]: decorator that adds retry logic to any `FetchAsync`
//!
//! # Retry Strategy
//!
//! - Exponential backoff starting at the configured base delay
//! - Maximum delay capped at 10 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use rand::{Rng, rng};
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Browser-like User-Agent; several sources refuse obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Trait for fetching a document body.
pub trait FetchAsync {
    /// Fetch the body at `url` as text.
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// Settings for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// [`FetchAsync`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(opts: &FetchOptions) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(opts.timeout)
            .connect_timeout(opts.connect_timeout)
            .user_agent(opts.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

impl FetchAsync for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`FetchAsync`] implementation.
///
/// The delay between retries follows:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryFetch<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T> RetryFetch<T>
where
    T: FetchAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(10),
        }
    }

    fn backoff(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(16) as u32;
        let delay = self.base_delay.saturating_mul(1 << shift).min(self.max_delay);
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + Duration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> FetchAsync for RetryFetch<T>
where
    T: FetchAsync,
{
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                            error = %e,
                            "fetch() exhausted retries"
                        );
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "fetch() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Fetches `url`, turning any failure into `None`.
pub async fn fetch_html<F: FetchAsync>(fetcher: &F, url: &str) -> Option<String> {
    match fetcher.fetch(url).await {
        Ok(body) => Some(body),
        Err(e) => {
            warn!(%url, error = %e, "Failed to fetch listing page");
            None
        }
    }
}
