// src/lib.rs
// =============================================================================
// lorem-sleuth: crawl a website and find leftover "lorem ipsum" text.
//
// The library holds everything except argument parsing, so the crawl can be
// driven from tests or another program without going through the CLI.
//
// Modules:
// - crawl: the crawl engine (config, scope, frontier, scheduler, results)
// - fetch: getting a page over HTTP
// - scan: finding placeholder text and links inside a page
// - model: the result types every other module shares
// - report: table, JSON and CSV renderings of a result
// - store: crawl history and user settings on disk
// - logging: tracing setup for the binary
// =============================================================================

pub mod crawl;
pub mod fetch;
pub mod logging;
pub mod model;
pub mod report;
pub mod scan;
pub mod store;

pub use crawl::{crawl_website, CrawlConfig, CrawlError, CrawlOptions, Crawler};
pub use model::{CrawlResult, CrawlScope, CrawlSummary, LoremSnippet, PageResult, PageStatus};
