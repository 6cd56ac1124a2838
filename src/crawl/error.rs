// src/crawl/error.rs
// =============================================================================
// Errors that can stop a crawl before or instead of producing a result.
//
// Per-page problems (bad status, timeouts, broken hrefs) never show up here:
// they are recorded as data inside the CrawlResult. Only a bad configuration,
// an HTTP client that cannot be built, or a crawl cancelled before its first
// page make it out as an Err.
// =============================================================================

use thiserror::Error;

/// Rejected crawl configuration. Raised before any network activity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid seed URL '{url}': {reason}")]
    InvalidSeedUrl { url: String, reason: String },

    #[error("seed URL must use http or https, got '{0}'")]
    UnsupportedScheme(String),

    #[error("seed URL has no hostname: {0}")]
    MissingHost(String),

    #[error("max pages must be at least 1")]
    ZeroMaxPages,

    #[error("max depth must be at least 1")]
    ZeroMaxDepth,

    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,
}

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("crawl cancelled before any page completed")]
    Cancelled,
}
