// src/crawl/counter.rs
// =============================================================================
// A shared integer cell.
//
// Used for two things:
// - the crawl's depth counter (one per crawl)
// - each link's occurrence tally (one per link)
//
// Cloning a Counter does NOT copy the number - both clones point at the same
// cell (Arc), so an increment through one is visible through the other.
// The only mutation is add(); reads are plain loads.
// =============================================================================

use std::cmp::Ordering as CmpOrdering;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Counter {
    value: Arc<AtomicUsize>,
}

impl Counter {
    /// Atomically adds `delta` and returns the updated value
    pub fn add(&self, delta: usize) -> usize {
        self.value.fetch_add(delta, Ordering::SeqCst) + delta
    }

    /// Point-in-time read
    pub fn get(&self) -> usize {
        self.value.load(Ordering::SeqCst)
    }
}

// Comparisons against plain integers: `counter > 1`, `counter < depth`

impl PartialEq<usize> for Counter {
    fn eq(&self, other: &usize) -> bool {
        self.get() == *other
    }
}

impl PartialOrd<usize> for Counter {
    fn partial_cmp(&self, other: &usize) -> Option<CmpOrdering> {
        self.get().partial_cmp(other)
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
