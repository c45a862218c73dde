// src/crawl/normalize.rs
// =============================================================================
// Same-host URL filtering and normalization.
//
// Every raw href/src found on a page goes through HostFilter::normalize()
// before the crawl engine looks at it. The rules:
//
// 1. Drop the "#fragment" and lowercase what is left
// 2. "/path"        -> "<root origin>/path"    (root-relative)
//    "//host/path"  -> "<root scheme>://host/path"  (protocol-relative)
// 3. Keep it only if it parses as an absolute http(s) URL whose hostname
//    equals the root's hostname
// 4. Rebuild it as origin + path + query, so a default port ("https://x.com:443")
//    spells the same as no port at all
// 5. Strip ONE trailing slash ("/docs/" -> "/docs", "https://x.com/" -> "https://x.com")
//
// Anything else (other hosts, bare "#anchors", "mailto:", "page.html" relative
// paths, empty strings) is rejected by returning None. Rejected references
// are not recorded anywhere.
// =============================================================================

use url::Url;

#[derive(Debug, Clone)]
pub struct HostFilter {
    /// "https://example.com" or "http://127.0.0.1:8080" - no trailing slash
    origin: String,
    scheme: String,
    host: String,
}

impl HostFilter {
    /// Builds the filter for a crawl rooted at `root`.
    ///
    /// Returns None if the root has no host (e.g. "mailto:" or "data:" URLs).
    pub fn for_root(root: &Url) -> Option<Self> {
        let host = root.host_str()?.to_ascii_lowercase();
        Some(Self {
            origin: root.origin().ascii_serialization(),
            scheme: root.scheme().to_string(),
            host,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Normalizes a raw reference, or rejects it with None
    pub fn normalize(&self, reference: &str) -> Option<String> {
        // Fragments never change which document is fetched
        let reference = reference.split('#').next().unwrap_or_default().trim();
        if reference.is_empty() {
            return None;
        }

        let lowered = reference.to_lowercase();
        let candidate = if lowered.starts_with("//") {
            format!("{}:{}", self.scheme, lowered)
        } else if lowered.starts_with('/') {
            format!("{}{}", self.origin, lowered)
        } else {
            lowered
        };

        let parsed = Url::parse(&candidate).ok()?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return None;
        }
        if parsed.host_str() != Some(self.host.as_str()) {
            return None;
        }

        let mut canonical = parsed.origin().ascii_serialization();
        canonical.push_str(parsed.path());
        if let Some(query) = parsed.query() {
            canonical.push('?');
            canonical.push_str(query);
        }
        if canonical.ends_with('/') {
            canonical.pop();
        }

        Some(canonical)
    }
}
