// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr) and find the data directory
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = no lorem ipsum, 1 = lorem ipsum found, 2 = error)
//
// Rust concepts used:
// - async/await: the crawl itself is async, the rest is plain code
// - Result<T, E>: errors bubble up with ? and become exit code 2
// - CancellationToken: Ctrl-C stops the crawl but keeps finished pages
// =============================================================================

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use cli::{Cli, Commands, HistoryAction, OutputArgs, ScanArgs, SettingsAction};
use lorem_sleuth::crawl::{CrawlConfig, CrawlOptions, Crawler};
use lorem_sleuth::logging::init_logging;
use lorem_sleuth::model::CrawlResult;
use lorem_sleuth::report;
use lorem_sleuth::store::{self, HistoryStore, JsonFileStore, Settings};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no lorem ipsum found
//   Ok(1) = lorem ipsum found
//   Err = anything went wrong (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let data_dir = cli.data_dir.unwrap_or_else(store::default_data_dir);

    match cli.command {
        Commands::Scan(args) => handle_scan(args, &data_dir).await,
        Commands::History { action } => handle_history(action, &data_dir),
        Commands::Settings { action } => handle_settings(action, &data_dir),
    }
}

// Handles the 'scan' subcommand
async fn handle_scan(args: ScanArgs, data_dir: &Path) -> Result<i32> {
    let settings = Settings::load(data_dir)?;

    // Flags win, then saved settings
    let config = CrawlConfig::builder(args.url.clone())
        .scope(args.scope.into())
        .max_pages(args.max_pages.unwrap_or(settings.default_max_pages))
        .max_depth(args.max_depth.unwrap_or(settings.default_max_depth))
        .exclusion_patterns(args.exclude.iter().cloned())
        .priority_query(args.priority_query.clone())
        .build()
        .with_context(|| format!("invalid crawl settings for {}", args.url))?;

    let options = CrawlOptions {
        concurrency: args.concurrency.unwrap_or(settings.max_concurrent_requests),
        request_timeout: args
            .timeout
            .map(Duration::from_secs)
            .unwrap_or_else(|| settings.request_timeout()),
        link_parser: args.parser.into(),
        ..CrawlOptions::default()
    };

    let crawler = Crawler::new(options).context("failed to set up the crawler")?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing with the pages scanned so far");
            ctrl_c.cancel();
        }
    });

    if !args.output.json {
        println!("🔍 Scanning website: {}", config.seed_url());
        println!(
            "📊 Scope: {}, max pages: {}, max depth: {}\n",
            config.scope(),
            config.max_pages(),
            config.max_depth()
        );
    }

    let result = crawler.run(&config, &cancel).await?;

    print_result(&result, &args.output)?;

    if settings.auto_save && !args.no_save {
        let history = JsonFileStore::in_dir(data_dir);
        history.save(&result)?;
        info!("Saved crawl {} to {}", result.id, history.path().display());
    }

    Ok(exit_code(&result))
}

// Handles 'history list|show|delete|clear'
fn handle_history(action: HistoryAction, data_dir: &Path) -> Result<i32> {
    let history = JsonFileStore::in_dir(data_dir);

    match action {
        HistoryAction::List => {
            let results = history.list()?;
            if results.is_empty() {
                println!("No saved crawls yet");
            } else {
                print!("{}", report::render_history(&results));
            }
            Ok(0)
        }
        HistoryAction::Show { id, output } => {
            let Some(result) = history.get(&id)? else {
                bail!("no saved crawl with id {}", id);
            };
            print_result(&result, &output)?;
            Ok(exit_code(&result))
        }
        HistoryAction::Delete { id } => {
            if !history.delete(&id)? {
                bail!("no saved crawl with id {}", id);
            }
            println!("🗑️  Deleted crawl {}", id);
            Ok(0)
        }
        HistoryAction::Clear => {
            history.clear()?;
            println!("🗑️  Crawl history cleared");
            Ok(0)
        }
    }
}

// Handles 'settings show|set'
fn handle_settings(action: SettingsAction, data_dir: &Path) -> Result<i32> {
    let mut settings = Settings::load(data_dir)?;

    match action {
        SettingsAction::Show => {
            for (key, value) in settings.entries() {
                println!("{:<24} {}", key, value);
            }
        }
        SettingsAction::Set { key, value } => {
            settings.set(&key, &value)?;
            settings.save(data_dir)?;
            println!("✅ {} = {}", key, value);
        }
    }
    Ok(0)
}

// Prints the result either as a table or JSON, and writes the CSV if asked
fn print_result(result: &CrawlResult, output: &OutputArgs) -> Result<()> {
    if output.json {
        println!("{}", report::to_json(result)?);
    } else {
        print!("{}", report::render_table(result));
    }

    if let Some(path) = &output.csv {
        let path = csv_path(path.as_deref(), result);
        std::fs::write(&path, report::render_csv(result))
            .with_context(|| format!("failed to write CSV report to {}", path.display()))?;
        info!("CSV report written to {}", path.display());
    }

    Ok(())
}

// `--csv out.csv` writes there, a bare `--csv` names the file after the crawl
fn csv_path(requested: Option<&Path>, result: &CrawlResult) -> PathBuf {
    match requested {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(report::default_csv_name(result)),
    }
}

fn exit_code(result: &CrawlResult) -> i32 {
    if result.found_lorem() {
        1
    } else {
        0
    }
}
