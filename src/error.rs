// src/error.rs
// =============================================================================
// Typed errors for the crawler.
//
// There are two layers:
// - CrawlError: problems that stop a crawl before it starts (bad root URL,
//   HTTP client that can't be built). These are the only hard failures.
// - FetchError: problems with one single link. The crawl engine logs these
//   and keeps going; they never reach the user as an error.
//
// Broken links (404) are not errors at all - they are a normal fetch outcome
// (see checker::FetchOutcome).
// =============================================================================

use thiserror::Error;

/// Errors that abort a crawl before any page is fetched.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The seed URL is not an absolute http(s) URL with a host
    #[error("invalid root URL '{url}': {reason}")]
    InvalidRootUrl { url: String, reason: String },

    /// The HTTP client could not be built from the configuration
    #[error("could not build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Per-link failures. Recoverable: the link is dropped from this wave.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("'{url}' is not an absolute URL: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    #[error("HTTP {0} redirect without a Location header")]
    MissingLocation(u16),

    #[error("redirect to unparseable location '{location}': {source}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },
}
