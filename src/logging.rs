// src/logging.rs
// =============================================================================
// Sets up tracing output for the CLI.
//
// Logs go to stderr so stdout stays clean for the table, or for JSON that
// another program is going to parse. RUST_LOG still works and is combined
// with the directives below.
// =============================================================================

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

// verbose = true turns on per-page debug lines (skips, queued links, ...)
pub fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::from_default_env()
        .add_directive(format!("lorem_sleuth={}", level).parse()?)
        .add_directive("warn".parse()?);

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
