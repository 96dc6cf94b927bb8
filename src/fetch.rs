//! Page fetching: one HTTP GET per call, paragraph text extraction and a typed
//! failure for everything that can go wrong on the way.
//!
//! The fetcher never retries. A failure is terminal for that evaluation and is
//! turned into a validation error by [`crate::validator::UrlValidator`].

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::FetchConfig;
use crate::telemetry::anon_hash;

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("paragraph selector"));

/// Text extracted from a successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub url: String,
    pub text: String,
}

impl PageContent {
    pub fn new(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }
}

/// Why a page could not be turned into readable content.
///
/// `Display` renders the user-facing message that ends up in the
/// `validation_error` field of the evaluation result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Error: Request timed out.")]
    Timeout,
    #[error("Error: HTTP {0} - Page may not exist.")]
    HttpStatus(u16),
    #[error("Error: Unable to fetch URL ({0}).")]
    Network(String),
    #[error("Error: No readable content found on the page.")]
    Empty,
    #[error("Error: Request cancelled.")]
    Cancelled,
}

impl FetchError {
    /// Stable, low-cardinality name used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::HttpStatus(_) => "http_status",
            Self::Network(_) => "network",
            Self::Empty => "empty",
            Self::Cancelled => "cancelled",
        }
    }
}

pub type FetchResult = Result<PageContent, FetchError>;

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult;

    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;

    /// Same as [`fetch`](Self::fetch), but gives up as soon as `cancel` fires.
    async fn fetch_cancellable(&self, url: &str, cancel: &CancellationToken) -> FetchResult {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            res = self.fetch(url) => res,
        }
    }
}

/// reqwest + scraper implementation.
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("building HTTP client for page fetch")?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let url_id = anon_hash(url);
        debug!(target: "fetch", %url_id, "fetching page");

        let response = self.http.get(url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            debug!(target: "fetch", %url_id, status = status.as_u16(), "non-success status");
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let html = response.text().await.map_err(classify)?;
        let text = extract_paragraph_text(&html);
        if text.trim().is_empty() {
            return Err(FetchError::Empty);
        }

        debug!(target: "fetch", %url_id, chars = text.chars().count(), "page content extracted");
        Ok(PageContent::new(url, text))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(e.to_string())
    }
}

/// Text of every `<p>` element in document order, joined with single spaces.
pub fn extract_paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paragraphs_with_single_space() {
        let html = r#"<html><body>
            <h1>Title is ignored</h1>
            <p>First paragraph.</p>
            <div><p>Second <b>bold</b> one.</p></div>
            <span>not a paragraph</span>
        </body></html>"#;
        assert_eq!(
            extract_paragraph_text(html),
            "First paragraph. Second bold one."
        );
    }

    #[test]
    fn no_paragraphs_yields_empty_text() {
        let html = "<html><body><div>Only a div</div></body></html>";
        assert!(extract_paragraph_text(html).is_empty());
    }

    #[test]
    fn entities_are_decoded() {
        let html = "<p>Fish &amp; chips</p>";
        assert_eq!(extract_paragraph_text(html), "Fish & chips");
    }

    #[test]
    fn error_messages_match_user_facing_wording() {
        assert_eq!(FetchError::Timeout.to_string(), "Error: Request timed out.");
        assert_eq!(
            FetchError::HttpStatus(404).to_string(),
            "Error: HTTP 404 - Page may not exist."
        );
        assert_eq!(
            FetchError::Network("dns failure".into()).to_string(),
            "Error: Unable to fetch URL (dns failure)."
        );
        assert_eq!(
            FetchError::Empty.to_string(),
            "Error: No readable content found on the page."
        );
        assert_eq!(FetchError::Cancelled.to_string(), "Error: Request cancelled.");
    }

    #[test]
    fn kinds_are_distinct() {
        let kinds = [
            FetchError::Timeout.kind(),
            FetchError::HttpStatus(500).kind(),
            FetchError::Network(String::new()).kind(),
            FetchError::Empty.kind(),
            FetchError::Cancelled.kind(),
        ];
        let uniq: std::collections::BTreeSet<_> = kinds.iter().collect();
        assert_eq!(uniq.len(), kinds.len());
    }

    struct NeverFetcher;

    #[async_trait]
    impl ContentFetcher for NeverFetcher {
        async fn fetch(&self, _url: &str) -> FetchResult {
            std::future::pending().await
        }
        fn name(&self) -> &'static str {
            "never"
        }
    }

    #[tokio::test]
    async fn cancellation_aborts_pending_fetch() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let res = NeverFetcher
            .fetch_cancellable("https://example.com", &cancel)
            .await;
        assert_eq!(res, Err(FetchError::Cancelled));
    }

    #[tokio::test]
    async fn invalid_url_is_a_network_error() {
        let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
        let res = fetcher.fetch("not a url").await;
        assert!(matches!(res, Err(FetchError::Network(_))), "got {res:?}");
    }
}
