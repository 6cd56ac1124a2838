// src/report.rs
// =============================================================================
// Turns a CrawlResult into something a person (or another tool) can read.
//
// Three formats:
// - table: aligned columns for the terminal, then snippets and a summary
// - JSON: the CrawlResult exactly as serialized (the compatibility format)
// - CSV: a multi-section report (summary, statistics, pages, snippets,
//   top offenders) that opens cleanly in a spreadsheet
//
// Every renderer returns a String; printing or writing it is the caller's job.
// =============================================================================

use std::fmt::Write as _;

use crate::model::{CrawlResult, PageResult, PageStatus};

/// Longest snippet context kept in the CSV report
const CSV_CONTEXT_CHARS: usize = 50;
const TOP_PAGES: usize = 10;

pub fn to_json(result: &CrawlResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

// Formats the status enum for the table
fn format_status(status: PageStatus) -> &'static str {
    match status {
        PageStatus::Clean => "✅ CLEAN",
        PageStatus::Lorem => "📝 LOREM",
        PageStatus::Error => "⚠️  ERROR",
    }
}

// Truncates on a char boundary and marks the cut with "..."
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

// Renders results as a human-readable table for the terminal
pub fn render_table(result: &CrawlResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{:<60} {:<12} {:>6}  {:<30}", "URL", "STATUS", "LOREM", "TITLE");
    let _ = writeln!(out, "{}", "=".repeat(112));

    for page in &result.pages {
        let detail = match &page.error {
            Some(error) => error.as_str(),
            None => page.title.as_str(),
        };
        let _ = writeln!(
            out,
            "{:<60} {:<12} {:>6}  {:<30}",
            truncate(&page.url, 60),
            format_status(page.status),
            page.lorem_count,
            truncate(detail, 30)
        );
    }

    let lorem_pages: Vec<&PageResult> = result.pages.iter().filter(|p| p.is_lorem()).collect();
    if !lorem_pages.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "📝 Placeholder text found:");
        for page in lorem_pages {
            let _ = writeln!(out, "   {}", page.url);
            for snippet in &page.snippets {
                let before = snippet.context_before.trim_start();
                let after = snippet.context_after.trim_end();
                let _ = writeln!(
                    out,
                    "      line {}: {}[{}]{}",
                    snippet.line_number,
                    truncate_start(before, 40),
                    snippet.lorem_text,
                    truncate(after, 40)
                );
            }
        }
    }

    let s = &result.summary;
    let _ = writeln!(out);
    let _ = writeln!(out, "📊 Summary:");
    let _ = writeln!(out, "   📋 Pages scanned: {}", s.total_pages);
    let _ = writeln!(out, "   📝 With lorem ipsum: {}", s.lorem_pages);
    let _ = writeln!(out, "   ✅ Clean: {}", s.clean_pages);
    let _ = writeln!(out, "   ⚠️  Errors: {}", s.error_pages());
    let _ = writeln!(out, "   🔢 Instances: {}", s.total_instances);
    let _ = writeln!(out, "   ⏱️  Scan time: {}", s.scan_time);

    out
}

// Keeps the END of a long string (the part right before a match)
fn truncate_start(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max {
        return text.to_string();
    }
    let kept: String = text.chars().skip(count - max.saturating_sub(3)).collect();
    format!("...{}", kept)
}

// Wraps a CSV field in quotes, doubling any quotes inside
fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn csv_context(text: &str) -> String {
    let cut: String = text.chars().take(CSV_CONTEXT_CHARS).collect();
    quoted(&cut)
}

/// The full CSV report.
pub fn render_csv(result: &CrawlResult) -> String {
    let config = &result.config;
    let s = &result.summary;
    let mut lines: Vec<String> = Vec::new();

    lines.push("Lorem Sleuth Crawl Report".to_string());
    lines.push(String::new());

    lines.push("=== CRAWL SUMMARY ===".to_string());
    lines.push(format!("Website URL,{}", config.seed_url()));
    lines.push(format!("Crawl Scope,{}", config.scope()));
    lines.push(format!("Max Pages,{}", config.max_pages()));
    lines.push(format!("Max Depth,{}", config.max_depth()));
    lines.push(format!("Scan Date,{}", result.created_at.format("%Y-%m-%d %H:%M:%S UTC")));
    lines.push(format!("Scan Time,{}", s.scan_time));
    lines.push(String::new());

    lines.push("=== STATISTICS ===".to_string());
    lines.push(format!("Total Pages Scanned,{}", s.total_pages));
    lines.push(format!("Pages with Lorem Ipsum,{}", s.lorem_pages));
    lines.push(format!("Clean Pages,{}", s.clean_pages));
    lines.push(format!("Total Lorem Instances,{}", s.total_instances));
    lines.push(format!("Lorem Percentage,{:.2}%", s.lorem_percentage()));
    lines.push(String::new());

    lines.push("=== DETAILED PAGE RESULTS ===".to_string());
    lines.push("Page #,URL,Status,Lorem Count,Page Title,Timestamp,Error Message".to_string());
    for (index, page) in result.pages.iter().enumerate() {
        let row = [
            (index + 1).to_string(),
            quoted(&page.url),
            page.status.to_string(),
            page.lorem_count.to_string(),
            quoted(&page.title),
            page.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            page.error.as_deref().map(quoted).unwrap_or_default(),
        ];
        lines.push(row.join(","));
    }

    let with_snippets: Vec<&PageResult> = result
        .pages
        .iter()
        .filter(|p| p.is_lorem() && !p.snippets.is_empty())
        .collect();
    if !with_snippets.is_empty() {
        lines.push(String::new());
        lines.push("=== LOREM IPSUM SNIPPETS ===".to_string());
        lines.push("URL,Line Number,Context Before,Lorem Text,Context After".to_string());
        for page in with_snippets {
            for snippet in &page.snippets {
                let row = [
                    quoted(&page.url),
                    snippet.line_number.to_string(),
                    csv_context(&snippet.context_before),
                    quoted(&snippet.lorem_text),
                    csv_context(&snippet.context_after),
                ];
                lines.push(row.join(","));
            }
        }
    }

    lines.push(String::new());
    lines.push("=== TOP PAGES WITH MOST LOREM INSTANCES ===".to_string());
    lines.push("Rank,URL,Lorem Count".to_string());
    let mut top: Vec<&PageResult> = result.pages.iter().filter(|p| p.lorem_count > 0).collect();
    top.sort_by(|a, b| b.lorem_count.cmp(&a.lorem_count));
    for (rank, page) in top.into_iter().take(TOP_PAGES).enumerate() {
        lines.push(format!("{},{},{}", rank + 1, quoted(&page.url), page.lorem_count));
    }

    lines.join("\n")
}

/// lorem-sleuth-report-<id>-<YYYY-MM-DD>.csv
pub fn default_csv_name(result: &CrawlResult) -> String {
    format!(
        "lorem-sleuth-report-{}-{}.csv",
        result.id,
        result.created_at.format("%Y-%m-%d")
    )
}

/// One line per stored crawl for `history list`
pub fn render_history(results: &[CrawlResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<38} {:<20} {:<40} {:>6} {:>6}", "ID", "DATE", "SEED", "PAGES", "LOREM");
    let _ = writeln!(out, "{}", "=".repeat(114));
    for r in results {
        let _ = writeln!(
            out,
            "{:<38} {:<20} {:<40} {:>6} {:>6}",
            r.id,
            r.created_at.format("%Y-%m-%d %H:%M:%S"),
            truncate(r.config.seed_url().as_str(), 40),
            r.summary.total_pages,
            r.summary.lorem_pages
        );
    }
    out
}
