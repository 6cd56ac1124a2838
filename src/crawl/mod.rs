// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from a seed URL
// - Scope rules (single page, domain, subdomains, everything) plus
//   user exclusion regexes
// - Page-count and depth limits
// - Optional frontier reordering from a free-text priority query
// - Bounded worker pool and cancellation
//
// Submodules:
// - config: validated CrawlConfig and engine CrawlOptions
// - scope: which discovered links may be followed
// - queue: frontier, visited set and page budget
// - prioritize: the Prioritizer capability and its fallback handling
// - aggregate: page results -> CrawlResult
// - scheduler: the crawl loop that ties it all together
// =============================================================================

mod aggregate;
mod config;
mod error;
mod prioritize;
mod queue;
mod scheduler;
mod scope;

pub use aggregate::{format_scan_time, summarize, ResultAggregator, ERROR_TITLE};
pub use config::{CrawlConfig, CrawlConfigBuilder, CrawlOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES};
pub use error::{ConfigError, CrawlError};
pub use prioritize::{is_permutation, IdentityPrioritizer, KeywordPrioritizer, Prioritizer};
pub use queue::{Frontier, FrontierItem, PageBudget};
pub use scheduler::{crawl_website, Crawler};
pub use scope::{compile_exclusions, in_scope, ScopeClassifier};
