// src/scan/mod.rs
// =============================================================================
// This module contains everything we do with a page's HTML once we have it.
//
// Submodules:
// - lorem: finds placeholder text and its surrounding line context
// - links: extracts outbound links to feed back into the crawl
//
// Neither touches the network, which keeps them easy to test with plain
// string fixtures.
// =============================================================================

mod links;
mod lorem;

pub use links::{href_links, DomLinkExtractor, HrefScanExtractor, LinkExtractor, LinkParser};
pub use lorem::{scan, ScanReport};
