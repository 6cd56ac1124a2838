// src/scan/links.rs
// =============================================================================
// This module extracts outbound links from HTML pages.
//
// Two strategies sit behind the same LinkExtractor trait:
//
// - HrefScanExtractor (default): a plain text scan for href="..." in
//   document order. It does not understand markup at all, so it misses
//   single-quoted and unquoted attributes, and it also picks up hrefs that
//   live inside comments or script strings.
// - DomLinkExtractor: parses the page with `scraper` (html5ever) and reads
//   <a href> and <link href> elements, whatever the quoting.
//
// Both resolve each href against the page URL with the `url` crate and
// silently drop anything that does not resolve.
//
// Rust concepts:
// - Traits: one interface, two interchangeable implementations
// - impl Iterator: return a lazy sequence without building a Vec first
// =============================================================================

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::{Arc, OnceLock};
use url::Url;

/// Pulls absolute link URLs out of a fetched page.
pub trait LinkExtractor: Send + Sync {
    fn extract_links(&self, html: &str, base_url: &Url) -> Vec<Url>;
}

/// Which LinkExtractor a crawl should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkParser {
    /// href="..." text scan
    #[default]
    Regex,
    /// Full HTML parse
    Dom,
}

impl LinkParser {
    pub fn extractor(self) -> Arc<dyn LinkExtractor> {
        match self {
            LinkParser::Regex => Arc::new(HrefScanExtractor),
            LinkParser::Dom => Arc::new(DomLinkExtractor),
        }
    }
}

fn href_regex() -> &'static Regex {
    static HREF: OnceLock<Regex> = OnceLock::new();
    HREF.get_or_init(|| Regex::new(r#"href="([^"]+)""#).expect("href pattern is a valid regex"))
}

// Lazily yields every double-quoted href in the document, resolved
//
// Parameters:
//   html: the HTML content to scan
//   base_url: the URL of the page (for resolving relative links)
//
// Example:
//   html = r#"<a href="/docs">Docs</a>"#
//   base_url = "https://example.com/page"
//   yields: https://example.com/docs
pub fn href_links<'a>(html: &'a str, base_url: &'a Url) -> impl Iterator<Item = Url> + 'a {
    href_regex()
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .filter_map(move |href| resolve_url(base_url, href.as_str()))
}

// Resolves a possibly-relative URL to an absolute URL
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs" -> Some("https://example.com/docs")
//   href = "../other" -> Some("https://example.com/other")
//   href = "https://other.com" -> Some("https://other.com/")
//   href = "http://[::1" -> None (malformed)
fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    base.join(href.trim()).ok()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HrefScanExtractor;

impl LinkExtractor for HrefScanExtractor {
    fn extract_links(&self, html: &str, base_url: &Url) -> Vec<Url> {
        href_links(html, base_url).collect()
    }
}

fn anchor_selector() -> &'static Selector {
    static ANCHORS: OnceLock<Selector> = OnceLock::new();
    // Constant selector, known to be valid
    ANCHORS.get_or_init(|| Selector::parse("a[href], link[href]").expect("selector is valid"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DomLinkExtractor;

impl LinkExtractor for DomLinkExtractor {
    fn extract_links(&self, html: &str, base_url: &Url) -> Vec<Url> {
        let document = Html::parse_document(html);

        document
            .select(anchor_selector())
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| resolve_url(base_url, href))
            .collect()
    }
}
