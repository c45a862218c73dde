// src/checker/http.rs
// =============================================================================
// Fetch & Classify: turns one link URL into exactly one outcome.
//
// Key functionality:
// - Makes an HTTP GET through a pluggable collaborator (HttpFetch)
// - Chases redirects itself, one hop at a time, with a hard cap
// - Sorts the final response into: page / broken / too many redirects / failed
// - Never panics and never returns Err: every problem is an outcome
//
// Why chase redirects by hand?
// - The crawl needs to know when a chain loops forever (redirect cap)
// - The reqwest client is therefore built with redirect::Policy::none()
//
// HTTP status codes:
// - 200-299: Success -> parse the page
// - 300-399: Redirect -> follow the Location header
// - 404:     Broken  -> reported, the crawl marks the link
// - anything else: a transient failure for this link only
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Client, StatusCode};
use url::Url;

use super::html::{HtmlPage, LinkSource, LinkTarget};
use crate::config::CrawlConfig;
use crate::error::FetchError;

/// What the HTTP collaborator hands back for a single request
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    /// Value of the Location header, if any
    pub location: Option<String>,
    /// Body text; only read for successful HTML responses
    pub body: Option<String>,
}

/// The network side of fetching, kept behind a trait so the crawl engine
/// can be driven by an in-memory site in tests.
///
/// Implementations must NOT follow redirects and must report network-level
/// failures as Err, distinct from HTTP status codes.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get(&self, url: &Url) -> Result<RawResponse, FetchError>;
}

/// Production collaborator backed by a reqwest Client.
///
/// Client is cheap to clone (it's a reference counter internally), so one
/// instance is shared by every worker for connection pooling.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get(&self, url: &Url) -> Result<RawResponse, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        // A missing Content-Type is treated as HTML; images, PDFs etc. are
        // never downloaded in full
        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.to_ascii_lowercase().contains("html"))
            .unwrap_or(true);

        let body = if status.is_success() && is_html {
            Some(response.text().await?)
        } else {
            None
        };

        Ok(RawResponse {
            status: status.as_u16(),
            location,
            body,
        })
    }
}

/// A successfully fetched page, reduced to what the crawl engine needs
#[derive(Debug, Clone)]
pub struct Document {
    /// Where the page was actually served from, after redirects
    pub final_url: Url,
    /// Raw references found in the page (empty for non-HTML content)
    pub targets: Vec<LinkTarget>,
}

/// The classification of one fetch
#[derive(Debug)]
pub enum FetchOutcome {
    /// 2xx, possibly after redirects
    Page(Document),
    /// 404 Not Found
    Broken,
    /// The redirect chain was longer than the configured cap
    TooManyRedirects(usize),
    /// Network error, timeout, unexpected status, bad redirect
    Failed(FetchError),
}

/// Fetches `url`, following up to `max_redirects` redirects, and
/// classifies the result.
///
/// The caller's link keeps its URL; redirects only change where we read
/// the page from.
pub async fn fetch_and_classify(
    fetcher: &dyn HttpFetch,
    url: &str,
    max_redirects: usize,
) -> FetchOutcome {
    let mut current = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(source) => {
            return FetchOutcome::Failed(FetchError::InvalidUrl {
                url: url.to_string(),
                source,
            })
        }
    };
    let mut redirects = 0;

    loop {
        let response = match fetcher.get(&current).await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::Failed(e),
        };

        let status = StatusCode::from_u16(response.status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_success() {
            let targets = response
                .body
                .as_deref()
                .map(extract_targets)
                .unwrap_or_default();
            return FetchOutcome::Page(Document {
                final_url: current,
                targets,
            });
        }

        if status.is_redirection() {
            if redirects >= max_redirects {
                return FetchOutcome::TooManyRedirects(redirects);
            }
            let Some(location) = response.location else {
                return FetchOutcome::Failed(FetchError::MissingLocation(response.status));
            };
            // Location may be relative to the URL that issued the redirect
            current = match current.join(&location) {
                Ok(next) => next,
                Err(source) => {
                    return FetchOutcome::Failed(FetchError::InvalidLocation { location, source })
                }
            };
            redirects += 1;
            continue;
        }

        if status == StatusCode::NOT_FOUND {
            return FetchOutcome::Broken;
        }

        return FetchOutcome::Failed(FetchError::UnexpectedStatus(response.status));
    }
}

// Kept out of the async fn: scraper::Html is not Send and must not live
// across an await point.
fn extract_targets(body: &str) -> Vec<LinkTarget> {
    HtmlPage::parse(body).extract_link_targets()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> ReqwestFetcher {
        ReqwestFetcher::new(&CrawlConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_success_returns_targets() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(r#"<a href="/a">A</a><img src="/logo.png">"#)
            .create_async()
            .await;

        let outcome = fetch_and_classify(&fetcher(), &server.url(), 10).await;
        match outcome {
            FetchOutcome::Page(doc) => {
                assert_eq!(
                    doc.targets,
                    vec![LinkTarget::page("/a"), LinkTarget::image("/logo.png")]
                );
            }
            other => panic!("expected a page, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_not_found_is_broken() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/missing", server.url());
        let outcome = fetch_and_classify(&fetcher(), &url, 10).await;
        assert!(matches!(outcome, FetchOutcome::Broken));
    }

    #[tokio::test]
    async fn test_server_error_is_transient_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/flaky")
            .with_status(503)
            .create_async()
            .await;

        let url = format!("{}/flaky", server.url());
        let outcome = fetch_and_classify(&fetcher(), &url, 10).await;
        assert!(matches!(
            outcome,
            FetchOutcome::Failed(FetchError::UnexpectedStatus(503))
        ));
    }

    #[tokio::test]
    async fn test_redirect_is_followed() {
        let mut server = mockito::Server::new_async().await;
        let _old = server
            .mock("GET", "/old")
            .with_status(301)
            .with_header("location", "/new")
            .create_async()
            .await;
        let _new = server
            .mock("GET", "/new")
            .with_status(200)
            .with_body(r#"<a href="/next">next</a>"#)
            .create_async()
            .await;

        let url = format!("{}/old", server.url());
        match fetch_and_classify(&fetcher(), &url, 10).await {
            FetchOutcome::Page(doc) => {
                assert_eq!(doc.final_url.path(), "/new");
                assert_eq!(doc.targets, vec![LinkTarget::page("/next")]);
            }
            other => panic!("expected a page, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_redirect_to_missing_page_is_broken() {
        let mut server = mockito::Server::new_async().await;
        let _old = server
            .mock("GET", "/moved")
            .with_status(302)
            .with_header("location", "/gone")
            .create_async()
            .await;
        let _gone = server
            .mock("GET", "/gone")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/moved", server.url());
        assert!(matches!(
            fetch_and_classify(&fetcher(), &url, 10).await,
            FetchOutcome::Broken
        ));
    }

    #[tokio::test]
    async fn test_redirect_loop_is_capped() {
        let mut server = mockito::Server::new_async().await;
        let looping = server
            .mock("GET", "/loop")
            .with_status(302)
            .with_header("location", "/loop")
            .expect(4)
            .create_async()
            .await;

        let url = format!("{}/loop", server.url());
        let outcome = fetch_and_classify(&fetcher(), &url, 3).await;
        assert!(matches!(outcome, FetchOutcome::TooManyRedirects(3)));
        // First request plus three followed hops
        looping.assert_async().await;
    }

    #[tokio::test]
    async fn test_redirect_without_location_fails() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/nowhere")
            .with_status(302)
            .create_async()
            .await;

        let url = format!("{}/nowhere", server.url());
        let outcome = fetch_and_classify(&fetcher(), &url, 10).await;
        assert!(matches!(
            outcome,
            FetchOutcome::Failed(FetchError::MissingLocation(302))
        ));
    }

    #[tokio::test]
    async fn test_non_html_success_has_no_targets() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/logo.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body("<a href=\"/not-a-link\">")
            .create_async()
            .await;

        let url = format!("{}/logo.png", server.url());
        match fetch_and_classify(&fetcher(), &url, 10).await {
            FetchOutcome::Page(doc) => assert!(doc.targets.is_empty()),
            other => panic!("expected a page, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_request_failure() {
        // Nothing listens on port 1
        let outcome = fetch_and_classify(&fetcher(), "http://127.0.0.1:1/", 10).await;
        assert!(matches!(
            outcome,
            FetchOutcome::Failed(FetchError::Request(_))
        ));
    }

    #[tokio::test]
    async fn test_unparseable_url_fails_without_request() {
        let outcome = fetch_and_classify(&fetcher(), "not a url", 10).await;
        assert!(matches!(
            outcome,
            FetchOutcome::Failed(FetchError::InvalidUrl { .. })
        ));
    }
}
