// src/scan/lorem.rs
// =============================================================================
// Finds "lorem ipsum" placeholder text in a page's raw HTML.
//
// The HTML is scanned as text, line by line, exactly as it came over the
// wire: markup, scripts and comments included, so placeholder text in an
// alt attribute or a meta description counts too.
//
// For every match we keep the rest of the line on both sides so a reader can
// find it without opening the page source.
//
// Rust concepts:
// - OnceLock: compile the regex once, the first time it is needed
// - find_iter: walks every non-overlapping match in a string
// =============================================================================

use regex::Regex;
use std::sync::OnceLock;

use crate::model::LoremSnippet;

// Only this two-word phrase, single space, ASCII case-insensitive
// (`-u` keeps look-alikes such as the long s "ſ" from matching "s")
fn lorem_regex() -> &'static Regex {
    static LOREM: OnceLock<Regex> = OnceLock::new();
    LOREM.get_or_init(|| Regex::new(r"(?i-u)lorem ipsum").expect("lorem pattern is a valid regex"))
}

/// What the scanner found on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub lorem_count: usize,
    pub snippets: Vec<LoremSnippet>,
}

impl ScanReport {
    pub fn has_lorem(&self) -> bool {
        self.lorem_count > 0
    }
}

// Scans HTML for placeholder text
//
// Lines are split on '\n' only, so a trailing '\r' from CRLF documents stays
// in contextAfter. Line numbers are 1-based.
//
// Example:
//   html = "<p>Lorem Ipsum is simply dummy text.</p>"
//   result = 1 snippet, loremText "Lorem Ipsum", lineNumber 1
pub fn scan(html: &str) -> ScanReport {
    let regex = lorem_regex();
    let mut snippets = Vec::new();

    for (index, line) in html.split('\n').enumerate() {
        for found in regex.find_iter(line) {
            snippets.push(LoremSnippet {
                context_before: line[..found.start()].to_string(),
                lorem_text: found.as_str().to_string(),
                context_after: line[found.end()..].to_string(),
                line_number: index + 1,
            });
        }
    }

    ScanReport {
        lorem_count: snippets.len(),
        snippets,
    }
}
