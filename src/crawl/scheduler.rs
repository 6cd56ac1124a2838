// src/crawl/scheduler.rs
// =============================================================================
// The crawl loop.
//
// How it works:
// 1. Put the seed on the frontier at depth 0
// 2. While there is budget and a free worker slot:
//    - let the prioritizer re-sort the frontier (only with a priority query)
//    - pop the next item; skip it if already visited or too deep
//    - reserve a page slot and start fetching it
// 3. Wait for a fetch to finish and fold it in:
//    - HTML  -> record the page, queue its in-scope links at depth + 1
//    - error -> record an error page, keep going
//    - not HTML -> give the page slot back, record nothing
// 4. Stop when nothing is queued or in flight, or the budget is used up
//
// With the default concurrency of 1 this is a plain sequential BFS: one page
// is fully processed before the next one is even popped. Higher concurrency
// runs fetches as tokio tasks, but the frontier, visited set and results are
// still only ever touched by this one loop.
//
// Rust concepts:
// - Arc<dyn Trait>: shared, swappable fetcher / extractor / prioritizer
// - JoinSet: a bag of spawned tasks we can await one at a time
// - tokio::select!: wait for "a task finished" OR "someone cancelled"
// =============================================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{self, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

use super::aggregate::ResultAggregator;
use super::config::{CrawlConfig, CrawlOptions};
use super::error::CrawlError;
use super::prioritize::{reprioritize, KeywordPrioritizer, Prioritizer};
use super::queue::{Frontier, FrontierItem, PageBudget};
use super::scope::ScopeClassifier;
use crate::fetch::{FetchError, Fetched, HttpFetcher, PageFetcher};
use crate::model::CrawlResult;
use crate::scan::{self, LinkExtractor, ScanReport};

/// What a worker hands back for one frontier item.
#[derive(Debug)]
struct PageOutcome {
    item: FrontierItem,
    kind: OutcomeKind,
}

#[derive(Debug)]
enum OutcomeKind {
    Scanned {
        title: String,
        report: ScanReport,
        links: Vec<Url>,
    },
    Skipped {
        content_type: String,
    },
    Failed(FetchError),
}

/// Runs crawls. Holds no per-crawl state: every call to `run` gets its own
/// frontier, visited set and budget.
#[derive(Clone)]
pub struct Crawler {
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn LinkExtractor>,
    prioritizer: Arc<dyn Prioritizer>,
    options: CrawlOptions,
}

impl Crawler {
    /// A crawler that fetches over HTTP with reqwest.
    pub fn new(options: CrawlOptions) -> Result<Self, CrawlError> {
        options.validate()?;
        let fetcher = HttpFetcher::new(options.request_timeout, &options.user_agent)?;
        Ok(Self::with_fetcher(Arc::new(fetcher), options))
    }

    /// A crawler with a caller-supplied fetcher (tests, other transports).
    pub fn with_fetcher(fetcher: Arc<dyn PageFetcher>, options: CrawlOptions) -> Self {
        Self {
            fetcher,
            extractor: options.link_parser.extractor(),
            prioritizer: Arc::new(KeywordPrioritizer),
            options,
        }
    }

    pub fn with_prioritizer(mut self, prioritizer: Arc<dyn Prioritizer>) -> Self {
        self.prioritizer = prioritizer;
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn LinkExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    /// Crawls from the config's seed until the frontier drains, the page
    /// budget is used up, or `cancel` fires.
    ///
    /// Per-page failures never end up here; they are error pages in the
    /// result. On cancellation the pages finished so far are returned, or
    /// `CrawlError::Cancelled` if there are none.
    pub async fn run(
        &self,
        config: &CrawlConfig,
        cancel: &CancellationToken,
    ) -> Result<CrawlResult, CrawlError> {
        self.options.validate()?;

        let classifier = ScopeClassifier::new(config);
        let budget = PageBudget::new(config.max_pages());
        let mut frontier = Frontier::new();
        let mut aggregator = ResultAggregator::start();
        let mut in_flight: JoinSet<PageOutcome> = JoinSet::new();
        // Which item each running task owns, so a panicked task can still be reported
        let mut assigned: HashMap<task::Id, FrontierItem> = HashMap::new();
        let mut cancelled = false;

        frontier.push(FrontierItem::seed(config.seed_url()));
        info!(
            "Crawling {} (scope: {}, max pages: {}, max depth: {})",
            config.seed_url(),
            config.scope(),
            config.max_pages(),
            config.max_depth()
        );

        loop {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            // Hand out work while there are free slots and budget left
            while in_flight.len() < self.options.concurrency
                && !frontier.is_empty()
                && !budget.is_exhausted()
            {
                if let Some(query) = config.priority_query() {
                    // A slow prioritizer must not hold up a cancel
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            cancelled = true;
                            break;
                        }
                        _ = reprioritize(
                            self.prioritizer.as_ref(),
                            &mut frontier,
                            query,
                            self.options.prioritize_timeout,
                        ) => {}
                    }
                }

                let Some(item) = frontier.pop() else { break };

                if item.depth > config.max_depth() {
                    debug!("Too deep [depth {}]: {}", item.depth, item.url);
                    continue;
                }
                if !frontier.mark_visited(item.key()) {
                    debug!("Already visited: {}", item.url);
                    continue;
                }
                if !budget.try_reserve() {
                    break;
                }

                info!("  Crawling [depth {}]: {}", item.depth, item.url);
                let handle = in_flight.spawn(fetch_and_scan(
                    Arc::clone(&self.fetcher),
                    Arc::clone(&self.extractor),
                    item.clone(),
                    config.max_depth(),
                    self.options.request_timeout,
                ));
                assigned.insert(handle.id(), item);
            }

            if cancelled || in_flight.is_empty() {
                break;
            }

            let joined = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                joined = in_flight.join_next_with_id() => joined,
            };

            match joined {
                Some(Ok((id, outcome))) => {
                    assigned.remove(&id);
                    absorb(outcome, &classifier, &budget, &mut frontier, &mut aggregator);
                }
                Some(Err(join_error)) => {
                    // The page was fetched (or tried), so it still gets a result
                    error!("Page worker failed: {}", join_error);
                    if let Some(item) = assigned.remove(&join_error.id()) {
                        let failure = FetchError::Worker(join_error.to_string());
                        aggregator.record_failed(item.key(), &failure);
                    }
                }
                None => break,
            }
        }

        if cancelled {
            in_flight.abort_all();
            warn!(
                "Crawl cancelled after {} page(s), {} still queued",
                aggregator.len(),
                frontier.len()
            );
            if aggregator.is_empty() {
                return Err(CrawlError::Cancelled);
            }
        }

        let result = aggregator.finish(config.clone());
        info!(
            "Crawl finished: {} page(s), {} with lorem ipsum, {} instance(s) in {}",
            result.summary.total_pages,
            result.summary.lorem_pages,
            result.summary.total_instances,
            result.summary.scan_time
        );
        Ok(result)
    }
}

// Fetches one page and does all the per-page work that doesn't need the
// frontier: scanning for lorem ipsum and pulling out links.
async fn fetch_and_scan(
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn LinkExtractor>,
    item: FrontierItem,
    max_depth: usize,
    timeout: Duration,
) -> PageOutcome {
    let fetched = match tokio::time::timeout(timeout, fetcher.fetch(&item.url)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout),
    };

    let kind = match fetched {
        Ok(Fetched::Html(page)) => {
            let report = scan::scan(&page.html);
            // At the depth ceiling the page is still scanned, just not expanded
            let links = if item.depth < max_depth {
                extractor.extract_links(&page.html, &item.url)
            } else {
                Vec::new()
            };
            OutcomeKind::Scanned {
                title: page.title,
                report,
                links,
            }
        }
        Ok(Fetched::Skipped { content_type }) => OutcomeKind::Skipped { content_type },
        Err(e) => OutcomeKind::Failed(e),
    };

    PageOutcome { item, kind }
}

// Folds a finished page into the crawl state
fn absorb(
    outcome: PageOutcome,
    classifier: &ScopeClassifier,
    budget: &PageBudget,
    frontier: &mut Frontier,
    aggregator: &mut ResultAggregator,
) {
    let PageOutcome { item, kind } = outcome;

    match kind {
        OutcomeKind::Scanned {
            title,
            report,
            links,
        } => {
            let page = aggregator.record_scanned(item.key(), title, report);
            if page.lorem_count > 0 {
                info!("  Found {} lorem ipsum instance(s) on {}", page.lorem_count, page.url);
            }

            let mut queued = 0;
            for link in links {
                if !classifier.allows(&link) {
                    continue;
                }
                let child = item.child(&link);
                if frontier.is_visited(child.key()) {
                    continue;
                }
                frontier.push(child);
                queued += 1;
            }
            debug!("Queued {} link(s) from {}", queued, item.url);
        }
        OutcomeKind::Skipped { content_type } => {
            debug!("Skipped non-HTML page {} ({})", item.url, content_type);
            budget.release();
        }
        OutcomeKind::Failed(e) => {
            warn!("  Failed to fetch {}: {}", item.url, e);
            aggregator.record_failed(item.key(), &e);
        }
    }
}

/// One-shot crawl over HTTP that runs to completion (no cancellation).
pub async fn crawl_website(config: &CrawlConfig, options: CrawlOptions) -> Result<CrawlResult, CrawlError> {
    let crawler = Crawler::new(options)?;
    crawler.run(config, &CancellationToken::new()).await
}
