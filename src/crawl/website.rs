// src/crawl/website.rs
// =============================================================================
// The breadth-first crawl engine.
//
// How it works:
// 1. The frontier starts as just the root link (depth 0), which is also the
//    first entry of the visited set
// 2. Each round ("wave") bumps the depth counter, then fetches EVERY link in
//    the frontier in parallel on a bounded worker pool
// 3. The engine waits for the whole wave, applying results as they finish:
//    - page:   normalize its references; new urls go into visited + the next
//              frontier at the new depth, known urls get an occurrence
//    - 404:    mark the link broken
//    - other:  log it and move on
// 4. Stop when a wave discovers nothing new
//
// Only this coordinating task ever touches `visited` and the frontier. The
// workers just fetch and hand back (url, outcome) through the JoinSet, so
// the sets need no locking and no url is ever scheduled twice.
//
// Cancellation (Ctrl+C or the configured deadline) aborts the fetches still
// in flight and returns whatever was visited so far.
// =============================================================================

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};
use url::Url;

use super::counter::Counter;
use super::link::Link;
use super::normalize::HostFilter;
use super::status::WebsiteStatus;
use crate::checker::{fetch_and_classify, FetchOutcome, HttpFetch, LinkTarget, ReqwestFetcher};
use crate::config::CrawlConfig;
use crate::error::CrawlError;

/// One site to crawl: the root url plus everything needed to fetch it
pub struct Website {
    root_url: String,
    filter: HostFilter,
    config: CrawlConfig,
    fetcher: Arc<dyn HttpFetch>,
    // Every log line of this crawl is recorded inside this span
    span: Span,
}

impl Website {
    pub fn with_config(url: &str, config: CrawlConfig) -> Result<Self, CrawlError> {
        // Validate before building the client: a bad root must fail fast
        parse_root(url)?;
        let fetcher = ReqwestFetcher::new(&config)?;
        Self::with_fetcher(url, config, Arc::new(fetcher))
    }

    /// A website fetched through a custom HTTP collaborator
    pub fn with_fetcher(
        url: &str,
        config: CrawlConfig,
        fetcher: Arc<dyn HttpFetch>,
    ) -> Result<Self, CrawlError> {
        let (root_url, filter) = parse_root(url)?;
        let span = info_span!("crawl", host = %filter.host());
        Ok(Self {
            root_url,
            filter,
            config,
            fetcher,
            span,
        })
    }

    /// Crawls the site and returns every discovered link.
    ///
    /// Stops early, with what was found so far, once `cancel` fires or the
    /// configured deadline passes.
    pub async fn get_links(&self, cancel: CancellationToken) -> HashSet<Link> {
        self.crawl(cancel).instrument(self.span.clone()).await
    }

    /// Crawls the site and folds the result into a report
    pub async fn get_status(&self, cancel: CancellationToken) -> WebsiteStatus {
        WebsiteStatus::from_links(&self.get_links(cancel).await)
    }

    async fn crawl(&self, cancel: CancellationToken) -> HashSet<Link> {
        let deadline = self.config.deadline.map(|budget| Instant::now() + budget);
        let workers = Arc::new(Semaphore::new(self.config.workers()));
        let depth = Counter::default();

        let mut visited = HashSet::new();
        visited.insert(Link::new(self.root_url.clone(), 0));
        let mut frontier = vec![self.root_url.clone()];

        info!("Root url is {}", self.root_url);

        while !frontier.is_empty() {
            // Links found while fetching this wave belong to the next depth
            let next_depth = depth.add(1);
            info!("Collecting depth {} links ({} to fetch)", depth, frontier.len());

            let mut tasks = JoinSet::new();
            for url in frontier.drain(..) {
                let fetcher = Arc::clone(&self.fetcher);
                let workers = Arc::clone(&workers);
                let max_redirects = self.config.max_redirects;
                tasks.spawn(
                    async move {
                        // The semaphore is never closed, so acquiring can't fail
                        let _permit = workers.acquire_owned().await.ok();
                        let outcome = fetch_and_classify(fetcher.as_ref(), &url, max_redirects).await;
                        (url, outcome)
                    }
                    .in_current_span(),
                );
            }

            let mut next_frontier = Vec::new();
            let mut cancelled = false;
            loop {
                tokio::select! {
                    // Prefer draining finished fetches over noticing cancellation
                    biased;
                    joined = tasks.join_next() => match joined {
                        Some(joined) => self.apply_result(joined, next_depth, &mut visited, &mut next_frontier),
                        None => break,
                    },
                    _ = stop_requested(&cancel, deadline) => {
                        warn!("Crawl cancelled, dropping {} in-flight fetches", tasks.len());
                        tasks.abort_all();
                        cancelled = true;
                        break;
                    }
                }
            }

            if cancelled {
                break;
            }

            frontier = next_frontier;
            info!(
                "Visited {} and has {} more links to go",
                visited.len(),
                frontier.len()
            );
        }

        visited
    }

    // Applies one finished fetch to the crawl state. Runs only on the
    // coordinating task.
    fn apply_result(
        &self,
        joined: Result<(String, FetchOutcome), JoinError>,
        next_depth: usize,
        visited: &mut HashSet<Link>,
        next_frontier: &mut Vec<String>,
    ) {
        let (url, outcome) = match joined {
            Ok(result) => result,
            Err(e) => {
                // A panicking worker loses only its own link
                error!("Unknown error occurred in a fetch task: {}", e);
                return;
            }
        };

        match outcome {
            FetchOutcome::Page(document) => {
                // A redirect may land on another site; its links are not ours
                if document.final_url.host_str() != Some(self.filter.host()) {
                    warn!(
                        "{} redirected off-site to {}, not collecting its links",
                        url, document.final_url
                    );
                    return;
                }
                debug!(
                    "Trying to collect links from {} ({} references)",
                    document.final_url,
                    document.targets.len()
                );
                let added = self.collect_targets(document.targets, next_depth, visited, next_frontier);
                debug!("Collected {} new links from {}", added, url);
            }
            FetchOutcome::Broken => {
                warn!("{} is broken", url);
                // take + insert: a HashSet hands out only shared references
                if let Some(mut link) = visited.take(url.as_str()) {
                    link.is_broken = true;
                    visited.insert(link);
                }
            }
            FetchOutcome::TooManyRedirects(hops) => {
                warn!("Gave up on {} after {} redirects", url, hops);
            }
            FetchOutcome::Failed(e) => {
                warn!("Something went wrong while requesting {}: {}", url, e);
            }
        }
    }

    // Returns how many links were new
    fn collect_targets(
        &self,
        targets: Vec<LinkTarget>,
        depth: usize,
        visited: &mut HashSet<Link>,
        next_frontier: &mut Vec<String>,
    ) -> usize {
        // A page counts once per target, however many times it repeats it
        let mut seen_on_page = HashSet::new();
        let mut added = 0;

        for target in targets {
            let Some(target_url) = self.filter.normalize(&target.href) else {
                continue;
            };
            if !seen_on_page.insert(target_url.clone()) {
                continue;
            }

            if let Some(known) = visited.get(target_url.as_str()) {
                known.occurrences.add(1);
                continue;
            }

            let link = if target.is_img {
                Link::image(target_url.clone(), depth)
            } else {
                Link::new(target_url.clone(), depth)
            };
            link.occurrences.add(1);
            visited.insert(link);
            next_frontier.push(target_url);
            added += 1;
        }

        added
    }
}

// Validates the seed url and returns its normalized form plus the filter
fn parse_root(url: &str) -> Result<(String, HostFilter), CrawlError> {
    let invalid = |reason: String| CrawlError::InvalidRootUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    let filter = HostFilter::for_root(&parsed).ok_or_else(|| invalid("URL has no host".to_string()))?;
    let root_url = filter
        .normalize(url)
        .ok_or_else(|| invalid("URL does not normalize to an absolute same-host URL".to_string()))?;

    Ok((root_url, filter))
}

// Resolves when the crawl should stop: external cancellation or deadline
async fn stop_requested(cancel: &CancellationToken, deadline: Option<Instant>) {
    match deadline {
        Some(at) => {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep_until(at) => {}
            }
        }
        None => cancel.cancelled().await,
    }
}
