// src/fetch/mod.rs
// =============================================================================
// This module retrieves pages for the crawler.
//
// The crawler only talks to the PageFetcher trait, never to reqwest
// directly. That keeps the scheduler testable with an in-memory fake and
// leaves room for other transports later.
//
// Contract of a fetch:
// - one GET, no retries
// - non-2xx status            -> Err(FetchError::Status)
// - 2xx but not text/html     -> Ok(Fetched::Skipped) (not an error!)
// - 2xx text/html             -> Ok(Fetched::Html) with body and <title>
//
// Submodules:
// - http: the reqwest-backed fetcher used by the CLI
// =============================================================================

mod http;

use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

pub use http::HttpFetcher;

/// Title recorded when a page has no <title> element
pub const NO_TITLE: &str = "No Title";

/// A successfully fetched HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlPage {
    pub html: String,
    pub title: String,
}

impl HtmlPage {
    pub fn new(html: String) -> Self {
        let title = extract_title(&html);
        Self { html, title }
    }
}

/// Result of a fetch that got a 2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    Html(HtmlPage),
    /// Any other content type. The page is left out of the results and
    /// its links are never followed.
    Skipped { content_type: String },
}

/// Why a page could not be fetched. The Display text ends up in the
/// page's `error` field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("too many redirects")]
    Redirect,

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),

    /// The task handling the page panicked
    #[error("page worker failed: {0}")]
    Worker(String),
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Fetched, FetchError>;
}

/// True for `text/html` with or without parameters such as charset.
pub fn is_html_content_type(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

fn title_regex() -> &'static Regex {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    TITLE.get_or_init(|| Regex::new(r"(?i)<title>(.*?)</title>").expect("title pattern is a valid regex"))
}

// Text of the first <title>...</title> on a single line, or "No Title"
pub fn extract_title(html: &str) -> String {
    title_regex()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NO_TITLE.to_string())
}
