// src/crawl/scope.rs
// =============================================================================
// Decides whether a discovered link may be put on the frontier.
//
// Two independent checks, in this order:
// 1. Hostname relationship to the seed, according to the crawl scope
// 2. The user's exclusion regexes (any match rejects the link)
//
// The seed page itself is never run through this filter: it is always
// scanned, even with the `single` scope.
//
// Subdomain matching is done on label boundaries: with a seed of `a.com`,
// `blog.a.com` is accepted but `xa.com` is not, even though the string
// "xa.com" ends with "a.com".
// =============================================================================

use regex::Regex;
use tracing::{debug, warn};
use url::Url;

use super::config::CrawlConfig;
use crate::model::CrawlScope;

/// Compiles exclusion patterns, skipping (and logging) the malformed ones.
///
/// A pattern that does not compile can never match anything, so dropping
/// it here gives exactly that behaviour without failing the crawl.
pub fn compile_exclusions(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!("Ignoring invalid exclusion pattern '{}': {}", pattern, e);
                None
            }
        })
        .collect()
}

/// Pure scope verdict for one candidate URL.
pub fn in_scope(candidate: &Url, seed_host: &str, scope: CrawlScope, exclusions: &[Regex]) -> bool {
    if !host_in_scope(candidate.host_str(), seed_host, scope) {
        return false;
    }

    let url_str = candidate.as_str();
    !exclusions.iter().any(|regex| regex.is_match(url_str))
}

fn host_in_scope(host: Option<&str>, seed_host: &str, scope: CrawlScope) -> bool {
    match scope {
        CrawlScope::Single => false,
        CrawlScope::All => true,
        CrawlScope::Domain => host.is_some_and(|h| h.eq_ignore_ascii_case(seed_host)),
        CrawlScope::Subdomains => host.is_some_and(|h| is_same_or_subdomain(h, seed_host)),
    }
}

fn is_same_or_subdomain(host: &str, seed_host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let seed_host = seed_host.to_ascii_lowercase();
    host == seed_host || host.ends_with(&format!(".{}", seed_host))
}

/// Scope rules for one crawl, with the exclusion patterns compiled once.
#[derive(Debug, Clone)]
pub struct ScopeClassifier {
    seed_host: String,
    scope: CrawlScope,
    exclusions: Vec<Regex>,
}

impl ScopeClassifier {
    pub fn new(config: &CrawlConfig) -> Self {
        Self {
            seed_host: config.seed_host().to_string(),
            scope: config.scope(),
            exclusions: compile_exclusions(config.exclusion_patterns()),
        }
    }

    /// Should this discovered link go on the frontier?
    ///
    /// Only http(s) links are ever eligible: anything else (mailto:, tel:,
    /// javascript:, data:) cannot be fetched as a page.
    pub fn allows(&self, candidate: &Url) -> bool {
        if candidate.scheme() != "http" && candidate.scheme() != "https" {
            debug!("Not following non-http link: {}", candidate);
            return false;
        }

        let verdict = in_scope(candidate, &self.seed_host, self.scope, &self.exclusions);
        if !verdict {
            debug!("Out of scope: {}", candidate);
        }
        verdict
    }
}
