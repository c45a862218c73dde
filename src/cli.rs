// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There is a single command:
//
//   site-census https://example.com [--max-workers 8] [--timeout 10]
//                                   [--deadline 300] [--max-redirects 10]
//                                   [--compact] [--verbose]
//
// The report is printed to stdout as JSON; logs go to stderr.
// =============================================================================

use clap::Parser;
use std::time::Duration;

use crate::config::{
    CrawlConfig, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_WORKERS,
};

#[derive(Parser, Debug)]
#[command(
    name = "site-census",
    version,
    about = "Crawl one website and report page depths, broken links and duplicate images",
    long_about = "site-census crawls every page reachable from ROOT_URL on the same host, \
                  breadth-first, and prints a JSON report with the depth at which each URL \
                  was first found, the URLs that returned 404, and images used on more than one page."
)]
pub struct Cli {
    /// Website URL to crawl (e.g., https://example.com)
    pub root_url: String,

    /// How many pages may be fetched at the same time
    #[arg(long, default_value_t = DEFAULT_MAX_WORKERS)]
    pub max_workers: usize,

    /// Timeout for a single request, in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Stop the whole crawl after this many seconds and report what was found
    #[arg(long, value_name = "SECS")]
    pub deadline: Option<u64>,

    /// Longest redirect chain to follow before giving up on a link
    #[arg(long, default_value_t = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: usize,

    /// Print the report on one line instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Log every page fetched (same as RUST_LOG=site_census=debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            max_workers: self.max_workers,
            fetch_timeout: Duration::from_secs(self.timeout),
            max_redirects: self.max_redirects,
            deadline: self.deadline.map(Duration::from_secs),
            ..Default::default()
        }
    }
}
