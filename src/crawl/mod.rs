// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling in depth "waves" starting from a root URL
// - Parallel fetching on a bounded worker pool
// - Same-host restriction (never leaves the root's hostname)
// - Global dedup: each URL is fetched at most once per crawl
// - A final report of depths, broken links and duplicate images
//
// Submodules:
// - counter:   shared integer cell (depth counter, occurrence tallies)
// - link:      a discovered URL, identified by the URL alone
// - normalize: same-host filtering of raw references
// - website:   the crawl engine
// - status:    folds the visited set into the report
// =============================================================================

mod counter;
mod link;
mod normalize;
mod status;
mod website;

pub use website::Website;
