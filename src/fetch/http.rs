// src/fetch/http.rs
// =============================================================================
// The reqwest-backed PageFetcher.
//
// Key functionality:
// - Makes a single HTTP GET per page (no retry, redirects followed)
// - Checks the status first, then the Content-Type
// - Reads the body only for HTML responses
// - Sorts reqwest failures into FetchError variants (timeout, connect, ...)
//
// Rust concepts:
// - async/await: For network I/O
// - Result<T, E>: For error handling
// - Enums: To represent different failure modes
// =============================================================================

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{is_html_content_type, FetchError, Fetched, HtmlPage, PageFetcher};

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Create an HTTP client with reasonable settings
    // We'll reuse this client for all requests (connection pooling)
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Fetched, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html_content_type(&content_type) {
            debug!("Skipping {} ({})", url, content_type);
            return Ok(Fetched::Skipped { content_type });
        }

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(Fetched::Html(HtmlPage::new(html)))
    }
}

// Categorizes different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure / refused connection
// - Too many redirects
// - etc.
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::Redirect
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else {
        FetchError::Request(error.to_string())
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why check the status before the Content-Type?
//    - A 404 page is usually HTML too; it must still be reported as an error
//    - Only successful responses get to decide "HTML or skip"
//
// 2. Why not read the body for skipped responses?
//    - A PDF or image can be large and we never look at it
//    - Dropping the response closes the connection without downloading it
//
// 3. Why map_err?
//    - reqwest::Error knows a lot about what went wrong
//    - Our callers only need the handful of cases in FetchError
// -----------------------------------------------------------------------------
