// src/crawl/config.rs
// =============================================================================
// Crawl configuration.
//
// Two structs live here:
// - CrawlConfig: WHAT to crawl (seed, scope, limits, exclusions, hint).
//   It is validated once by CrawlConfigBuilder::build() and never changes
//   afterwards; it is also stored inside every CrawlResult.
// - CrawlOptions: HOW to crawl (worker count, timeouts, user agent, which
//   link extractor). These are resource knobs, not part of a result.
//
// Rust concepts:
// - Builder pattern: chainable setters that end in a validating build()
// - Private fields + getters: once built, nobody can mutate the config
// =============================================================================

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::error::ConfigError;
use crate::model::CrawlScope;
use crate::scan::LinkParser;

pub const DEFAULT_MAX_PAGES: usize = 100;
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Validated, immutable description of one crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlConfig {
    seed_url: Url,
    scope: CrawlScope,
    max_pages: usize,
    max_depth: usize,
    #[serde(default)]
    exclusion_patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority_query: Option<String>,
}

impl CrawlConfig {
    /// Starts a builder with the usual defaults:
    /// domain scope, 100 pages, depth 3, no exclusions, no priority hint.
    pub fn builder(seed_url: impl Into<String>) -> CrawlConfigBuilder {
        CrawlConfigBuilder {
            seed_url: seed_url.into(),
            scope: CrawlScope::default(),
            max_pages: DEFAULT_MAX_PAGES,
            max_depth: DEFAULT_MAX_DEPTH,
            exclusion_patterns: Vec::new(),
            priority_query: None,
        }
    }

    pub fn seed_url(&self) -> &Url {
        &self.seed_url
    }

    /// Hostname of the seed; validated to exist by build()
    pub fn seed_host(&self) -> &str {
        self.seed_url.host_str().unwrap_or_default()
    }

    pub fn scope(&self) -> CrawlScope {
        self.scope
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn exclusion_patterns(&self) -> &[String] {
        &self.exclusion_patterns
    }

    pub fn priority_query(&self) -> Option<&str> {
        self.priority_query.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct CrawlConfigBuilder {
    seed_url: String,
    scope: CrawlScope,
    max_pages: usize,
    max_depth: usize,
    exclusion_patterns: Vec<String>,
    priority_query: Option<String>,
}

impl CrawlConfigBuilder {
    pub fn scope(mut self, scope: CrawlScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclusion_patterns.push(pattern.into());
        self
    }

    pub fn exclusion_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusion_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn priority_query(mut self, query: Option<String>) -> Self {
        self.priority_query = query;
        self
    }

    /// Validates everything and freezes the configuration.
    ///
    /// Blank exclusion lines are dropped and a blank priority query counts
    /// as no query. Malformed exclusion regexes are NOT an error here: they
    /// are kept as typed and simply never match (see scope.rs).
    pub fn build(self) -> Result<CrawlConfig, ConfigError> {
        let seed_url = Url::parse(self.seed_url.trim()).map_err(|e| ConfigError::InvalidSeedUrl {
            url: self.seed_url.clone(),
            reason: e.to_string(),
        })?;

        if seed_url.scheme() != "http" && seed_url.scheme() != "https" {
            return Err(ConfigError::UnsupportedScheme(seed_url.scheme().to_string()));
        }
        if seed_url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingHost(self.seed_url));
        }
        if self.max_pages == 0 {
            return Err(ConfigError::ZeroMaxPages);
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroMaxDepth);
        }

        let exclusion_patterns = self
            .exclusion_patterns
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        let priority_query = self
            .priority_query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        Ok(CrawlConfig {
            seed_url,
            scope: self.scope,
            max_pages: self.max_pages,
            max_depth: self.max_depth,
            exclusion_patterns,
            priority_query,
        })
    }
}

/// Engine resource settings for a crawl run.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Fetches allowed in flight at once; 1 keeps the crawl strictly sequential
    pub concurrency: usize,
    pub request_timeout: Duration,
    pub prioritize_timeout: Duration,
    pub user_agent: String,
    pub link_parser: LinkParser,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            request_timeout: Duration::from_secs(10),
            prioritize_timeout: Duration::from_secs(30),
            user_agent: format!("lorem-sleuth/{}", env!("CARGO_PKG_VERSION")),
            link_parser: LinkParser::default(),
        }
    }
}

impl CrawlOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroRequestTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::builder("https://x.test/").build().unwrap();
        assert_eq!(config.scope(), CrawlScope::Domain);
        assert_eq!(config.max_pages(), 100);
        assert_eq!(config.max_depth(), 3);
        assert_eq!(config.seed_host(), "x.test");
        assert!(config.exclusion_patterns().is_empty());
        assert!(config.priority_query().is_none());
    }

    #[test]
    fn test_rejects_unparsable_seed() {
        let err = CrawlConfig::builder("not a url").build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeedUrl { .. }));
    }

    #[test]
    fn test_rejects_non_http_seed() {
        let err = CrawlConfig::builder("ftp://x.test/file").build().unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedScheme("ftp".to_string()));
    }

    #[test]
    fn test_rejects_zero_limits() {
        let err = CrawlConfig::builder("https://x.test/")
            .max_pages(0)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::ZeroMaxPages);

        let err = CrawlConfig::builder("https://x.test/")
            .max_depth(0)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::ZeroMaxDepth);
    }

    #[test]
    fn test_blank_inputs_are_dropped() {
        let config = CrawlConfig::builder("https://x.test/")
            .exclusion_patterns(vec!["", "  ", r"\.pdf$"])
            .priority_query(Some("   ".to_string()))
            .build()
            .unwrap();
        assert_eq!(config.exclusion_patterns(), &[r"\.pdf$".to_string()]);
        assert!(config.priority_query().is_none());
    }

    #[test]
    fn test_config_json_field_names() {
        let config = CrawlConfig::builder("https://x.test/")
            .scope(CrawlScope::All)
            .priority_query(Some("blog".to_string()))
            .build()
            .unwrap();
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["seedUrl"], "https://x.test/");
        assert_eq!(value["scope"], "all");
        assert_eq!(value["maxPages"], 100);
        assert_eq!(value["maxDepth"], 3);
        assert_eq!(value["priorityQuery"], "blog");
        assert!(value["exclusionPatterns"].is_array());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let options = CrawlOptions {
            concurrency: 0,
            ..CrawlOptions::default()
        };
        assert_eq!(options.validate(), Err(ConfigError::ZeroConcurrency));
    }

    #[test]
    fn test_zero_request_timeout_rejected() {
        let options = CrawlOptions {
            request_timeout: Duration::ZERO,
            ..CrawlOptions::default()
        };
        assert_eq!(options.validate(), Err(ConfigError::ZeroRequestTimeout));
        assert_eq!(CrawlOptions::default().validate(), Ok(()));
    }
}
