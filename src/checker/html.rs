// src/checker/html.rs
// =============================================================================
// This module pulls link targets out of HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Unlike a browser we do NOT resolve the targets here. The crawl engine
// applies its own same-host normalization (crawl::normalize), so this layer
// only answers "which raw href/src strings does this page contain?".
//
// Two kinds of targets are reported:
//   <a href="...">   -> page references
//   <img src="...">  -> image references (is_img = true)
// =============================================================================

use scraper::{Html, Selector};
use std::sync::OnceLock;

/// One raw reference found in a document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkTarget {
    /// The attribute value exactly as written in the markup
    pub href: String,
    /// True when the reference came from an <img> element
    pub is_img: bool,
}

impl LinkTarget {
    pub fn page(href: impl Into<String>) -> Self {
        Self { href: href.into(), is_img: false }
    }

    pub fn image(href: impl Into<String>) -> Self {
        Self { href: href.into(), is_img: true }
    }
}

/// Anything that can list the link targets it contains.
///
/// The crawl engine only depends on this capability, not on how a document
/// was parsed.
pub trait LinkSource {
    fn extract_link_targets(&self) -> Vec<LinkTarget>;
}

/// A parsed HTML page.
///
/// `scraper::Html` is not `Send`, so an `HtmlPage` lives only inside the
/// worker task that fetched it. The targets are what crosses threads.
pub struct HtmlPage {
    document: Html,
}

impl HtmlPage {
    pub fn parse(markup: &str) -> Self {
        Self {
            document: Html::parse_document(markup),
        }
    }
}

impl LinkSource for HtmlPage {
    fn extract_link_targets(&self) -> Vec<LinkTarget> {
        let mut targets = Vec::new();

        for element in self.document.select(anchor_selector()) {
            if let Some(href) = element.value().attr("href") {
                targets.push(LinkTarget::page(href.trim()));
            }
        }

        for element in self.document.select(image_selector()) {
            if let Some(src) = element.value().attr("src") {
                targets.push(LinkTarget::image(src.trim()));
            }
        }

        targets
    }
}

// Selectors are constants, so parsing them can only fail on a typo here.
// They are parsed once and shared by every worker.
fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("valid selector"))
}

fn image_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("img[src]").expect("valid selector"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_anchor() {
        let page = HtmlPage::parse(r#"<a href="/docs">Docs</a>"#);
        assert_eq!(page.extract_link_targets(), vec![LinkTarget::page("/docs")]);
    }

    #[test]
    fn test_extract_image() {
        let page = HtmlPage::parse(r#"<p><img src="/logo.png" alt="logo"></p>"#);
        assert_eq!(
            page.extract_link_targets(),
            vec![LinkTarget::image("/logo.png")]
        );
    }

    #[test]
    fn test_anchor_without_href_is_skipped() {
        let page = HtmlPage::parse(r#"<a name="top">Top</a><img alt="no source">"#);
        assert!(page.extract_link_targets().is_empty());
    }

    #[test]
    fn test_targets_are_raw_and_trimmed() {
        // No resolution happens here - relative and foreign links come back as written
        let page = HtmlPage::parse(
            r#"
            <a href=" /About/ ">About</a>
            <a href="https://other.com/x">Other</a>
            <a href="mailto:someone@example.com">Mail</a>
        "#,
        );
        let hrefs: Vec<_> = page
            .extract_link_targets()
            .into_iter()
            .map(|t| t.href)
            .collect();
        assert_eq!(
            hrefs,
            vec!["/About/", "https://other.com/x", "mailto:someone@example.com"]
        );
    }

    #[test]
    fn test_anchors_then_images() {
        let page = HtmlPage::parse(
            r#"<img src="/a.png"><a href="/page">Page</a><img src="/b.png">"#,
        );
        let targets = page.extract_link_targets();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0], LinkTarget::page("/page"));
        assert!(targets[1..].iter().all(|t| t.is_img));
    }
}
