// src/crawl/queue.rs
// =============================================================================
// The crawl frontier: pages waiting to be scanned, plus the visited set.
//
// How it works:
// 1. The seed goes in at depth 0
// 2. The scheduler pops from the front (breadth-first order)
// 3. A URL joins the visited set when it is popped, not when it is found,
//    so the same URL may sit in the queue twice (found via two pages) but
//    is only ever scanned once
// 4. A prioritizer may re-sort the whole queue before a pop
//
// URLs are stored with their #fragment removed, so `/page#top` and
// `/page#footer` count as the same page.
//
// Rust concepts:
// - HashSet: To track visited URLs (O(1) lookup)
// - VecDeque: Double-ended queue for breadth-first crawling
// - AtomicUsize: A counter that can be checked-and-updated in one step
// =============================================================================

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

// Represents a page in the crawl queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierItem {
    pub url: Url,
    pub depth: usize, // Link hops from the seed (seed = 0)
}

impl FrontierItem {
    pub fn new(url: &Url, depth: usize) -> Self {
        Self {
            url: normalize(url),
            depth,
        }
    }

    pub fn seed(url: &Url) -> Self {
        Self::new(url, 0)
    }

    /// A link found on this page, one hop deeper
    pub fn child(&self, url: &Url) -> Self {
        Self::new(url, self.depth + 1)
    }

    pub fn key(&self) -> &str {
        self.url.as_str()
    }
}

// Strips the fragment so in-page anchors don't look like new pages
pub fn normalize(url: &Url) -> Url {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    normalized
}

/// Pending items in BFS order plus every URL already taken off the queue.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierItem>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: FrontierItem) {
        self.queue.push_back(item);
    }

    pub fn pop(&mut self) -> Option<FrontierItem> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Queued URLs in current order, duplicates included
    pub fn urls(&self) -> Vec<String> {
        self.queue.iter().map(|item| item.key().to_string()).collect()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Marks a URL visited. Returns false if it already was.
    ///
    /// Test and set happen in one call so two workers can never both be
    /// handed the same page.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Re-sorts the queue to follow `order`.
    ///
    /// The sort is stable, so items with the same rank (repeated URLs) keep
    /// their insertion order, and URLs missing from `order` go last.
    pub fn reorder(&mut self, order: &[String]) {
        let mut rank: HashMap<&str, usize> = HashMap::with_capacity(order.len());
        for (i, url) in order.iter().enumerate() {
            rank.entry(url.as_str()).or_insert(i);
        }

        self.queue
            .make_contiguous()
            .sort_by_key(|item| rank.get(item.key()).copied().unwrap_or(usize::MAX));
    }
}

/// Page-count budget shared by everything in flight.
///
/// A slot is reserved before a page is fetched and released again if the
/// fetch turns out not to produce a page (non-HTML response). Reservations
/// are a single compare-and-swap, so completions can never push the number
/// of recorded pages past the limit.
#[derive(Debug)]
pub struct PageBudget {
    limit: usize,
    reserved: AtomicUsize,
}

impl PageBudget {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            reserved: AtomicUsize::new(0),
        }
    }

    pub fn try_reserve(&self) -> bool {
        self.reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                (used < self.limit).then_some(used + 1)
            })
            .is_ok()
    }

    pub fn release(&self) {
        let _ = self
            .reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| used.checked_sub(1));
    }

    pub fn is_exhausted(&self) -> bool {
        self.reserved.load(Ordering::Acquire) >= self.limit
    }

    pub fn reserved(&self) -> usize {
        self.reserved.load(Ordering::Acquire)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why mark visited on pop instead of on push?
//    - A page can be linked from many places before we reach it
//    - Marking on pop means the first time it reaches the front wins
//    - The extra queue entries are skipped for free later
//
// 2. What is fetch_update?
//    - It reads the atomic, runs our closure, and writes the new value only
//      if nobody changed it in between (retrying otherwise)
//    - Returning None from the closure means "don't update", which is how
//      try_reserve refuses once the limit is hit
//
// 3. Why sort_by_key on make_contiguous()?
//    - VecDeque stores items in a ring buffer that may wrap around
//    - make_contiguous() gives us one &mut slice we can sort in place
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn item(s: &str, depth: usize) -> FrontierItem {
        FrontierItem::new(&Url::parse(s).unwrap(), depth)
    }

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new();
        frontier.push(item("https://x.test/a", 1));
        frontier.push(item("https://x.test/b", 1));
        assert_eq!(frontier.pop().unwrap().key(), "https://x.test/a");
        assert_eq!(frontier.pop().unwrap().key(), "https://x.test/b");
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn test_fragment_is_stripped() {
        let a = item("https://x.test/page#top", 1);
        assert_eq!(a.key(), "https://x.test/page");
    }

    #[test]
    fn test_child_depth() {
        let parent = item("https://x.test/", 2);
        let child = parent.child(&Url::parse("https://x.test/next").unwrap());
        assert_eq!(child.depth, 3);
    }

    #[test]
    fn test_mark_visited_once() {
        let mut frontier = Frontier::new();
        assert!(frontier.mark_visited("https://x.test/"));
        assert!(!frontier.mark_visited("https://x.test/"));
        assert!(frontier.is_visited("https://x.test/"));
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn test_reorder_follows_ranking() {
        let mut frontier = Frontier::new();
        frontier.push(item("https://x.test/a", 1));
        frontier.push(item("https://x.test/b", 1));
        frontier.push(item("https://x.test/c", 1));
        frontier.reorder(&[
            "https://x.test/c".to_string(),
            "https://x.test/a".to_string(),
            "https://x.test/b".to_string(),
        ]);
        assert_eq!(
            frontier.urls(),
            vec!["https://x.test/c", "https://x.test/a", "https://x.test/b"]
        );
    }

    #[test]
    fn test_reorder_keeps_duplicates_together_in_insertion_order() {
        let mut frontier = Frontier::new();
        frontier.push(item("https://x.test/a", 1));
        frontier.push(item("https://x.test/b", 1));
        frontier.push(item("https://x.test/a", 2));
        frontier.reorder(&[
            "https://x.test/a".to_string(),
            "https://x.test/b".to_string(),
            "https://x.test/a".to_string(),
        ]);
        let depths: Vec<_> = std::iter::from_fn(|| frontier.pop())
            .map(|i| (i.key().to_string(), i.depth))
            .collect();
        assert_eq!(
            depths,
            vec![
                ("https://x.test/a".to_string(), 1),
                ("https://x.test/a".to_string(), 2),
                ("https://x.test/b".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_budget_never_exceeds_limit() {
        let budget = PageBudget::new(2);
        assert!(budget.try_reserve());
        assert!(budget.try_reserve());
        assert!(!budget.try_reserve());
        assert!(budget.is_exhausted());

        budget.release();
        assert!(!budget.is_exhausted());
        assert!(budget.try_reserve());
        assert_eq!(budget.reserved(), 2);
    }

    #[test]
    fn test_budget_release_does_not_underflow() {
        let budget = PageBudget::new(1);
        budget.release();
        assert_eq!(budget.reserved(), 0);
    }
}
