// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Three subcommands:
// - scan: crawl a website and report placeholder text
// - history: look at (or clean up) crawls saved earlier
// - settings: view or change the saved defaults
//
// Flags that have a saved default (max pages, depth, concurrency, timeout)
// are Option<...> here. None means "use the value from settings.json".
//
// Rust concepts:
// - Derive macros: Parser, Subcommand, Args and ValueEnum generate the parsing
// - From: converts the CLI-only enums into the library's types
// =============================================================================

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use lorem_sleuth::model::CrawlScope;
use lorem_sleuth::scan::LinkParser;

#[derive(Parser, Debug)]
#[command(
    name = "lorem-sleuth",
    version,
    about = "Crawl a website and find leftover lorem ipsum placeholder text",
    long_about = "lorem-sleuth crawls a website breadth-first and reports every page that still \
                  contains \"lorem ipsum\" placeholder text. It exits with code 1 when placeholder \
                  text is found, so it fits in a CI pipeline."
)]
pub struct Cli {
    /// Directory for history.json and settings.json
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Print debug logs (skipped pages, queued links, ...)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website and scan every page for lorem ipsum
    ///
    /// Example: lorem-sleuth scan https://example.com --scope subdomains --max-pages 50
    Scan(ScanArgs),

    /// Show or delete saved crawl results
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Show or change saved defaults
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Website URL to start from (e.g., https://example.com)
    pub url: String,

    /// Which discovered links may be followed
    #[arg(long, value_enum, default_value_t = ScopeArg::Domain)]
    pub scope: ScopeArg,

    /// Stop after this many pages [default: from settings, 100]
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// How many link hops from the start page to follow [default: from settings, 3]
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Regex for URLs to skip (can be repeated)
    #[arg(long = "exclude", value_name = "REGEX")]
    pub exclude: Vec<String>,

    /// Visit URLs that match these words first
    #[arg(long, value_name = "QUERY")]
    pub priority_query: Option<String>,

    /// Pages fetched at once [default: from settings, 1]
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds [default: from settings, 10]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// How links are pulled out of a page
    #[arg(long, value_enum, default_value_t = ParserArg::Regex)]
    pub parser: ParserArg,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Don't add this crawl to the history
    #[arg(long)]
    pub no_save: bool,
}

/// Output flags shared by `scan` and `history show`
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Print the full result as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Also write a CSV report. Without a path the file is named after the crawl
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub csv: Option<Option<PathBuf>>,
}

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// List saved crawls, newest first
    List,

    /// Show one saved crawl
    Show {
        id: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Delete one saved crawl
    Delete { id: String },

    /// Delete every saved crawl
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print all settings
    Show,

    /// Change one setting, e.g. `settings set defaultMaxPages 50`
    Set { key: String, value: String },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    /// Only the start page
    Single,
    /// Same host as the start page
    Domain,
    /// The start host and its subdomains
    Subdomains,
    /// Any http(s) link
    All,
}

impl From<ScopeArg> for CrawlScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Single => CrawlScope::Single,
            ScopeArg::Domain => CrawlScope::Domain,
            ScopeArg::Subdomains => CrawlScope::Subdomains,
            ScopeArg::All => CrawlScope::All,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ParserArg {
    /// Fast scan for href="..." anywhere in the HTML
    Regex,
    /// Parse the DOM and read <a>/<link> href attributes
    Dom,
}

impl From<ParserArg> for LinkParser {
    fn from(arg: ParserArg) -> Self {
        match arg {
            ParserArg::Regex => LinkParser::Regex,
            ParserArg::Dom => LinkParser::Dom,
        }
    }
}
