// src/crawl/status.rs
// =============================================================================
// The final report.
//
// WebsiteStatus is folded from the crawl's visited set in one pass:
// - links:        every url -> the depth it was first found at
// - broken_links: urls that answered 404
// - dup_images:   image urls referenced from more than one page
//
// BTreeMap / BTreeSet keep the JSON keys sorted, so two runs over the same
// site print byte-identical reports.
// =============================================================================

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::link::Link;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebsiteStatus {
    pub links: BTreeMap<String, usize>,
    pub broken_links: BTreeSet<String>,
    pub dup_images: BTreeSet<String>,
}

impl WebsiteStatus {
    /// Builds the report from a set of visited links.
    ///
    /// Pure: the same links always give the same report.
    pub fn from_links<'a>(links: impl IntoIterator<Item = &'a Link>) -> Self {
        let mut status = WebsiteStatus::default();

        for link in links {
            status
                .links
                .entry(link.url.clone())
                .or_insert(link.depth);

            if link.is_broken {
                status.broken_links.insert(link.url.clone());
            }

            if link.is_img && link.occurrences > 1 {
                status.dup_images.insert(link.url.clone());
            }
        }

        status
    }

    /// Serializes the report as JSON
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
