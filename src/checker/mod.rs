// src/checker/mod.rs
// =============================================================================
// Fetch & Classify.
//
// Submodules:
// - http: fetches a URL (redirects chased by hand) and classifies the result
// - html: lists the href/src targets of a parsed HTML page
//
// The crawl engine (src/crawl/) only talks to this module through
// fetch_and_classify() and the HttpFetch trait.
// =============================================================================

mod html;
mod http;

pub use html::LinkTarget;
pub use http::{fetch_and_classify, FetchOutcome, HttpFetch, ReqwestFetcher};

// In-memory fetchers in the crawl tests build these by hand
#[cfg(test)]
pub use http::RawResponse;
