// src/crawl/link.rs
// =============================================================================
// A discovered URL and what the crawl learned about it.
//
// A Link is identified by its url ALONE: two Links with the same url are the
// same link no matter their depth or flags. Eq, Hash and Borrow<str> all
// follow that rule, which lets the visited set be a HashSet<Link> that can be
// queried with a plain &str.
//
// The url is stored already normalized (see normalize.rs); Link does no
// normalization itself.
// =============================================================================

use std::borrow::Borrow;
use std::hash::{Hash, Hasher};

use super::counter::Counter;

#[derive(Debug, Clone)]
pub struct Link {
    pub url: String,
    /// BFS depth at first discovery; never revised
    pub depth: usize,
    /// Number of distinct pages seen referencing this url
    pub occurrences: Counter,
    pub is_broken: bool,
    pub is_img: bool,
}

impl Link {
    pub fn new(url: impl Into<String>, depth: usize) -> Self {
        Self {
            url: url.into(),
            depth,
            occurrences: Counter::default(),
            is_broken: false,
            is_img: false,
        }
    }

    pub fn image(url: impl Into<String>, depth: usize) -> Self {
        Self {
            is_img: true,
            ..Self::new(url, depth)
        }
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for Link {}

// Must hash exactly like the url's str so that Borrow<str> lookups work
impl Hash for Link {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.as_str().hash(state);
    }
}

impl Borrow<str> for Link {
    fn borrow(&self) -> &str {
        &self.url
    }
}
