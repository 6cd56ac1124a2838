// src/store/settings.rs
// =============================================================================
// User preferences, saved as settings.json in the data directory.
//
// Every field has a serde default, so an older or hand-edited file with
// missing keys still loads. Command-line flags always win over these.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::{write_atomic, StoreError};
use crate::crawl::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Keep every finished crawl in the history
    #[serde(default = "default_auto_save")]
    pub auto_save: bool,

    #[serde(default = "default_max_pages")]
    pub default_max_pages: usize,

    #[serde(default = "default_max_depth")]
    pub default_max_depth: usize,

    /// Fetches in flight at once
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_auto_save() -> bool {
    true
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_max_concurrent_requests() -> usize {
    1
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_save: default_auto_save(),
            default_max_pages: default_max_pages(),
            default_max_depth: default_max_depth(),
            max_concurrent_requests: default_max_concurrent_requests(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Settings {
    pub const FILE_NAME: &'static str = "settings.json";

    /// Keys accepted by `set`, in the order `settings show` prints them
    pub const KEYS: [&'static str; 5] = [
        "autoSave",
        "defaultMaxPages",
        "defaultMaxDepth",
        "maxConcurrentRequests",
        "requestTimeout",
    ];

    /// Loads `<dir>/settings.json`, or defaults if there is none yet.
    pub fn load(dir: &Path) -> Result<Self, StoreError> {
        let path = dir.join(Self::FILE_NAME);
        match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Json { path, source }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    pub fn save(&self, dir: &Path) -> Result<(), StoreError> {
        let path = dir.join(Self::FILE_NAME);
        let json = serde_json::to_vec_pretty(self).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        write_atomic(&path, &json)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Updates one setting from its string form. Numbers must be >= 1.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let invalid = || StoreError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        let positive = || -> Result<usize, StoreError> {
            value.parse::<usize>().ok().filter(|n| *n > 0).ok_or_else(invalid)
        };

        match key {
            "autoSave" => self.auto_save = value.parse().map_err(|_| invalid())?,
            "defaultMaxPages" => self.default_max_pages = positive()?,
            "defaultMaxDepth" => self.default_max_depth = positive()?,
            "maxConcurrentRequests" => self.max_concurrent_requests = positive()?,
            "requestTimeout" => self.request_timeout = positive()? as u64,
            _ => return Err(StoreError::UnknownSetting(key.to_string())),
        }
        Ok(())
    }

    /// (key, value) pairs for display
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("autoSave", self.auto_save.to_string()),
            ("defaultMaxPages", self.default_max_pages.to_string()),
            ("defaultMaxDepth", self.default_max_depth.to_string()),
            ("maxConcurrentRequests", self.max_concurrent_requests.to_string()),
            ("requestTimeout", self.request_timeout.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.default_max_pages, 100);
        assert_eq!(settings.default_max_depth, 3);
        assert!(settings.auto_save);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(Settings::FILE_NAME), r#"{"defaultMaxPages": 25}"#).unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.default_max_pages, 25);
        assert_eq!(settings.request_timeout, 10);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.set("maxConcurrentRequests", "4").unwrap();
        settings.set("autoSave", "false").unwrap();
        settings.save(dir.path()).unwrap();

        let reloaded = Settings::load(dir.path()).unwrap();
        assert_eq!(reloaded.max_concurrent_requests, 4);
        assert!(!reloaded.auto_save);
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.set("defaultMaxDepth", "0"),
            Err(StoreError::InvalidValue { .. })
        ));
        assert!(matches!(
            settings.set("requestTimeout", "soon"),
            Err(StoreError::InvalidValue { .. })
        ));
        assert!(matches!(
            settings.set("theme", "dark"),
            Err(StoreError::UnknownSetting(_))
        ));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_entries_cover_every_key() {
        let keys: Vec<_> = Settings::default().entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, Settings::KEYS.to_vec());
    }
}
