// src/model.rs
// =============================================================================
// This module defines the data that flows out of a crawl.
//
// Everything here is serialized with camelCase field names because the JSON
// shape is what the export, history and any outside tooling read back:
//
//   CrawlResult
//   ├── config   (CrawlConfig, see crawl/config.rs)
//   ├── summary  (CrawlSummary, always derived from pages)
//   └── pages[]  (PageResult)
//        └── snippets[] (LoremSnippet)
//
// Rust concepts:
// - Serde derive: turns structs into JSON without hand-written code
// - Enums with rename_all: "clean" / "lorem" / "error" on the wire
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crawl::CrawlConfig;

/// Which discovered links are eligible to be followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlScope {
    /// Only the seed page is scanned
    Single,
    /// Links on exactly the seed's hostname
    #[default]
    Domain,
    /// The seed's hostname and anything below it
    Subdomains,
    /// Every http(s) link
    All,
}

impl CrawlScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrawlScope::Single => "single",
            CrawlScope::Domain => "domain",
            CrawlScope::Subdomains => "subdomains",
            CrawlScope::All => "all",
        }
    }
}

impl fmt::Display for CrawlScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One located occurrence of placeholder text plus the rest of its line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoremSnippet {
    pub context_before: String,
    /// The matched text with its original casing
    pub lorem_text: String,
    pub context_after: String,
    /// 1-based line in the fetched HTML
    pub line_number: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Clean,
    Lorem,
    Error,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Clean => "clean",
            PageStatus::Lorem => "lorem",
            PageStatus::Error => "error",
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of scanning (or failing to fetch) a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub id: String,
    pub url: String,
    pub status: PageStatus,
    pub lorem_count: usize,
    pub snippets: Vec<LoremSnippet>,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageResult {
    pub fn is_lorem(&self) -> bool {
        self.status == PageStatus::Lorem
    }
}

/// Counts derived from the page list when a crawl is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlSummary {
    pub total_pages: usize,
    pub lorem_pages: usize,
    pub clean_pages: usize,
    pub total_instances: usize,
    /// Wall-clock duration formatted as "<m>m <s>s"
    pub scan_time: String,
}

impl CrawlSummary {
    pub fn error_pages(&self) -> usize {
        self.total_pages - self.lorem_pages - self.clean_pages
    }

    /// Share of scanned pages that contain placeholder text, in percent
    pub fn lorem_percentage(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        self.lorem_pages as f64 / self.total_pages as f64 * 100.0
    }
}

/// The only artifact a crawl hands back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    pub id: String,
    pub config: CrawlConfig,
    pub summary: CrawlSummary,
    pub pages: Vec<PageResult>,
    pub created_at: DateTime<Utc>,
}

impl CrawlResult {
    pub fn found_lorem(&self) -> bool {
        self.summary.lorem_pages > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_serializes_lowercase() {
        let json = serde_json::to_string(&CrawlScope::Subdomains).unwrap();
        assert_eq!(json, "\"subdomains\"");
        let scope: CrawlScope = serde_json::from_str("\"single\"").unwrap();
        assert_eq!(scope, CrawlScope::Single);
    }

    #[test]
    fn test_snippet_uses_camel_case() {
        let snippet = LoremSnippet {
            context_before: "<p>".to_string(),
            lorem_text: "Lorem ipsum".to_string(),
            context_after: " dolor</p>".to_string(),
            line_number: 3,
        };
        let value = serde_json::to_value(&snippet).unwrap();
        assert_eq!(value["contextBefore"], "<p>");
        assert_eq!(value["loremText"], "Lorem ipsum");
        assert_eq!(value["lineNumber"], 3);
    }

    #[test]
    fn test_error_field_omitted_when_absent() {
        let page = PageResult {
            id: "page_1".to_string(),
            url: "https://x.test/".to_string(),
            status: PageStatus::Clean,
            lorem_count: 0,
            snippets: vec![],
            title: "Home".to_string(),
            timestamp: Utc::now(),
            error: None,
        };
        let value = serde_json::to_value(&page).unwrap();
        assert!(value.get("error").is_none());
        assert_eq!(value["status"], "clean");
        assert_eq!(value["loremCount"], 0);
    }

    #[test]
    fn test_summary_derived_numbers() {
        let summary = CrawlSummary {
            total_pages: 8,
            lorem_pages: 2,
            clean_pages: 5,
            total_instances: 7,
            scan_time: "0m 4s".to_string(),
        };
        assert_eq!(summary.error_pages(), 1);
        assert!((summary.lorem_percentage() - 25.0).abs() < f64::EPSILON);
    }
}
