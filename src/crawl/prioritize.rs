// src/crawl/prioritize.rs
// =============================================================================
// Optional reordering of the frontier from a free-text hint.
//
// When a crawl has a priority query and more than one URL is waiting, the
// scheduler hands the whole queue to a Prioritizer before every pop and
// re-sorts the queue to match the answer.
//
// The answer is only trusted if it is a permutation of what was sent. A
// prioritizer that errors, runs past its timeout, adds or drops URLs leaves
// the queue exactly as it was; the crawl never fails because of it.
// =============================================================================

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use super::queue::Frontier;

#[async_trait]
pub trait Prioritizer: Send + Sync {
    /// Returns `urls` in the order they should be crawled.
    async fn prioritize(&self, urls: &[String], query: &str) -> anyhow::Result<Vec<String>>;
}

/// Keeps the queue order as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPrioritizer;

#[async_trait]
impl Prioritizer for IdentityPrioritizer {
    async fn prioritize(&self, urls: &[String], _query: &str) -> anyhow::Result<Vec<String>> {
        Ok(urls.to_vec())
    }
}

/// Ranks URLs by how many of the query's words they contain.
///
/// Words are split on anything that isn't alphanumeric and compared
/// lower-cased against the whole URL, so "pricing blog" moves
/// `/blog/pricing-2024` ahead of `/blog/archive`, which moves ahead of
/// `/contact`. Equal scores keep their queue order.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordPrioritizer;

impl KeywordPrioritizer {
    fn score(url: &str, terms: &[String]) -> usize {
        let url = url.to_lowercase();
        terms.iter().filter(|term| url.contains(term.as_str())).count()
    }
}

#[async_trait]
impl Prioritizer for KeywordPrioritizer {
    async fn prioritize(&self, urls: &[String], query: &str) -> anyhow::Result<Vec<String>> {
        let terms: Vec<String> = query
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();

        let mut ranked = urls.to_vec();
        ranked.sort_by_key(|url| std::cmp::Reverse(Self::score(url, &terms)));
        Ok(ranked)
    }
}

/// Same URLs, same number of times each, any order.
pub fn is_permutation(input: &[String], output: &[String]) -> bool {
    if input.len() != output.len() {
        return false;
    }

    let mut counts: HashMap<&str, isize> = HashMap::new();
    for url in input {
        *counts.entry(url.as_str()).or_default() += 1;
    }
    for url in output {
        *counts.entry(url.as_str()).or_default() -= 1;
    }
    counts.values().all(|&n| n == 0)
}

/// Asks the prioritizer for a new order and applies it if it is usable.
///
/// Returns true when the frontier was re-sorted.
pub async fn reprioritize(
    prioritizer: &dyn Prioritizer,
    frontier: &mut Frontier,
    query: &str,
    timeout: Duration,
) -> bool {
    if frontier.len() < 2 {
        return false;
    }

    let urls = frontier.urls();
    match tokio::time::timeout(timeout, prioritizer.prioritize(&urls, query)).await {
        Ok(Ok(order)) if is_permutation(&urls, &order) => {
            frontier.reorder(&order);
            debug!("Frontier reprioritized ({} URLs)", urls.len());
            true
        }
        Ok(Ok(order)) => {
            warn!(
                "Prioritizer returned {} URLs that don't match the {} queued; keeping queue order",
                order.len(),
                urls.len()
            );
            false
        }
        Ok(Err(e)) => {
            warn!("Prioritization failed, continuing with normal queue: {:#}", e);
            false
        }
        Err(_) => {
            warn!("Prioritization timed out after {:?}, continuing with normal queue", timeout);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::queue::FrontierItem;
    use url::Url;

    fn frontier_of(urls: &[&str]) -> Frontier {
        let mut frontier = Frontier::new();
        for u in urls {
            frontier.push(FrontierItem::new(&Url::parse(u).unwrap(), 1));
        }
        frontier
    }

    struct Reverse;

    #[async_trait]
    impl Prioritizer for Reverse {
        async fn prioritize(&self, urls: &[String], _query: &str) -> anyhow::Result<Vec<String>> {
            Ok(urls.iter().rev().cloned().collect())
        }
    }

    struct Failing;

    #[async_trait]
    impl Prioritizer for Failing {
        async fn prioritize(&self, _urls: &[String], _query: &str) -> anyhow::Result<Vec<String>> {
            anyhow::bail!("model unavailable")
        }
    }

    struct DropsOne;

    #[async_trait]
    impl Prioritizer for DropsOne {
        async fn prioritize(&self, urls: &[String], _query: &str) -> anyhow::Result<Vec<String>> {
            Ok(urls[1..].to_vec())
        }
    }

    struct Slow;

    #[async_trait]
    impl Prioritizer for Slow {
        async fn prioritize(&self, urls: &[String], _query: &str) -> anyhow::Result<Vec<String>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(urls.iter().rev().cloned().collect())
        }
    }

    const URLS: [&str; 3] = ["https://x.test/a", "https://x.test/b", "https://x.test/c"];

    #[tokio::test]
    async fn test_applies_valid_order() {
        let mut frontier = frontier_of(&URLS);
        assert!(reprioritize(&Reverse, &mut frontier, "q", Duration::from_secs(1)).await);
        assert_eq!(frontier.urls(), vec![URLS[2], URLS[1], URLS[0]]);
    }

    #[tokio::test]
    async fn test_error_keeps_order() {
        let mut frontier = frontier_of(&URLS);
        assert!(!reprioritize(&Failing, &mut frontier, "q", Duration::from_secs(1)).await);
        assert_eq!(frontier.urls(), URLS.to_vec());
    }

    #[tokio::test]
    async fn test_non_permutation_keeps_order() {
        let mut frontier = frontier_of(&URLS);
        assert!(!reprioritize(&DropsOne, &mut frontier, "q", Duration::from_secs(1)).await);
        assert_eq!(frontier.urls(), URLS.to_vec());
    }

    #[tokio::test]
    async fn test_timeout_keeps_order() {
        let mut frontier = frontier_of(&URLS);
        assert!(!reprioritize(&Slow, &mut frontier, "q", Duration::from_millis(50)).await);
        assert_eq!(frontier.urls(), URLS.to_vec());
    }

    #[tokio::test]
    async fn test_single_item_is_not_sent() {
        let mut frontier = frontier_of(&URLS[..1]);
        assert!(!reprioritize(&Reverse, &mut frontier, "q", Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn test_keyword_ranking() {
        let urls: Vec<String> = vec![
            "https://x.test/contact".into(),
            "https://x.test/blog/archive".into(),
            "https://x.test/blog/pricing-2024".into(),
        ];
        let ranked = KeywordPrioritizer
            .prioritize(&urls, "Pricing blog")
            .await
            .unwrap();
        assert_eq!(
            ranked,
            vec![
                "https://x.test/blog/pricing-2024",
                "https://x.test/blog/archive",
                "https://x.test/contact",
            ]
        );
        assert!(is_permutation(&urls, &ranked));
    }

    #[tokio::test]
    async fn test_identity_keeps_order() {
        let urls: Vec<String> = URLS.iter().map(|s| s.to_string()).collect();
        let out = IdentityPrioritizer.prioritize(&urls, "anything").await.unwrap();
        assert_eq!(out, urls);
    }

    #[test]
    fn test_permutation_counts_duplicates() {
        let a = vec!["x".to_string(), "x".to_string(), "y".to_string()];
        let b = vec!["y".to_string(), "x".to_string(), "x".to_string()];
        let c = vec!["y".to_string(), "x".to_string(), "y".to_string()];
        assert!(is_permutation(&a, &b));
        assert!(!is_permutation(&a, &c));
        assert!(!is_permutation(&a, &a[..2]));
    }
}
