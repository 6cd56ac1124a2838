// src/store/mod.rs
// =============================================================================
// Persistence for things that outlive a single crawl.
//
// The crawl engine never touches this module. The CLI loads settings before
// a crawl and hands the finished CrawlResult to a HistoryStore afterwards.
//
// Submodules:
// - history: the HistoryStore trait and its JSON file backend
// - settings: user defaults (max pages, depth, concurrency, timeout, ...)
// =============================================================================

mod history;
mod settings;

use std::path::PathBuf;
use thiserror::Error;

pub use history::{HistoryStore, JsonFileStore};
pub use settings::Settings;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown setting '{0}'")]
    UnknownSetting(String),

    #[error("invalid value '{value}' for setting '{key}'")]
    InvalidValue { key: String, value: String },
}

/// Where history and settings live when no --data-dir is given.
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "lorem-sleuth", "lorem-sleuth")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".lorem-sleuth"))
}

// Writes through a temp file + rename so a crash never leaves half a file
pub(crate) fn write_atomic(path: &std::path::Path, contents: &[u8]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, contents).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)
}
