// src/crawl/aggregate.rs
// =============================================================================
// Collects page results in the order they complete and turns them into the
// final CrawlResult.
//
// The summary is never kept as running counters that could drift: it is
// computed from the page list once, when the crawl is finished.
// =============================================================================

use chrono::Utc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use super::config::CrawlConfig;
use crate::fetch::FetchError;
use crate::model::{CrawlResult, CrawlSummary, PageResult, PageStatus};
use crate::scan::ScanReport;

/// Title stored on pages that could not be fetched
pub const ERROR_TITLE: &str = "Error Fetching Page";

#[derive(Debug)]
pub struct ResultAggregator {
    started: Instant,
    pages: Vec<PageResult>,
}

impl ResultAggregator {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            pages: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    fn next_id(&self) -> String {
        format!("page_{}", self.pages.len() + 1)
    }

    /// Records a page that was fetched and scanned.
    pub fn record_scanned(&mut self, url: &str, title: String, report: ScanReport) -> &PageResult {
        let status = if report.has_lorem() {
            PageStatus::Lorem
        } else {
            PageStatus::Clean
        };

        let page = PageResult {
            id: self.next_id(),
            url: url.to_string(),
            status,
            lorem_count: report.lorem_count,
            snippets: report.snippets,
            title,
            timestamp: Utc::now(),
            error: None,
        };
        self.push(page)
    }

    /// Records a page whose fetch failed.
    pub fn record_failed(&mut self, url: &str, error: &FetchError) -> &PageResult {
        let page = PageResult {
            id: self.next_id(),
            url: url.to_string(),
            status: PageStatus::Error,
            lorem_count: 0,
            snippets: Vec::new(),
            title: ERROR_TITLE.to_string(),
            timestamp: Utc::now(),
            error: Some(error.to_string()),
        };
        self.push(page)
    }

    fn push(&mut self, page: PageResult) -> &PageResult {
        self.pages.push(page);
        &self.pages[self.pages.len() - 1]
    }

    /// Assembles the immutable result with a fresh id and timestamp.
    pub fn finish(self, config: CrawlConfig) -> CrawlResult {
        let summary = summarize(&self.pages, self.started.elapsed());

        CrawlResult {
            id: Uuid::new_v4().to_string(),
            config,
            summary,
            pages: self.pages,
            created_at: Utc::now(),
        }
    }
}

pub fn summarize(pages: &[PageResult], elapsed: Duration) -> CrawlSummary {
    let count = |status: PageStatus| pages.iter().filter(|p| p.status == status).count();

    CrawlSummary {
        total_pages: pages.len(),
        lorem_pages: count(PageStatus::Lorem),
        clean_pages: count(PageStatus::Clean),
        total_instances: pages.iter().map(|p| p.lorem_count).sum(),
        scan_time: format_scan_time(elapsed),
    }
}

// 125.7 seconds -> "2m 5s"
pub fn format_scan_time(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}m {}s", secs / 60, secs % 60)
}
