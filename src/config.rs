// src/config.rs
// =============================================================================
// Crawl settings.
//
// The CLI fills this in from flags (see cli.rs); tests build it directly
// with struct update syntax: CrawlConfig { max_workers: 2, ..Default::default() }
// =============================================================================

use std::time::Duration;

/// Default size of the fetch worker pool
pub const DEFAULT_MAX_WORKERS: usize = 8;

/// Default length of a redirect chain before we give up on a link
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Default per-request timeout, in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// How many fetches may be in flight at once
    pub max_workers: usize,
    /// Timeout for a single HTTP request (connect + response)
    pub fetch_timeout: Duration,
    /// Longest redirect chain followed for one link
    pub max_redirects: usize,
    /// Overall budget for the whole crawl; None = run until the frontier empties
    pub deadline: Option<Duration>,
    /// Sent as the User-Agent header
    pub user_agent: String,
}

impl CrawlConfig {
    /// Worker count, never zero
    pub fn workers(&self) -> usize {
        self.max_workers.max(1)
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            deadline: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
