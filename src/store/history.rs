// src/store/history.rs
// =============================================================================
// Crawl history: every finished CrawlResult the user chose to keep.
//
// The backend is a single JSON array on disk (history.json), newest first.
// Histories are small (one entry per crawl the user ran), so reading and
// rewriting the whole file on every change is fine.
// =============================================================================

use std::path::{Path, PathBuf};

use super::{write_atomic, StoreError};
use crate::model::CrawlResult;

pub trait HistoryStore {
    /// Stores a result, replacing any earlier entry with the same id.
    fn save(&self, result: &CrawlResult) -> Result<(), StoreError>;

    /// All stored results, newest first.
    fn list(&self) -> Result<Vec<CrawlResult>, StoreError>;

    fn get(&self, id: &str) -> Result<Option<CrawlResult>, StoreError> {
        Ok(self.list()?.into_iter().find(|r| r.id == id))
    }

    /// Returns whether anything was deleted.
    fn delete(&self, id: &str) -> Result<bool, StoreError>;

    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub const FILE_NAME: &'static str = "history.json";

    /// Store backed by `<dir>/history.json`. Nothing is created until the
    /// first save.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self, results: &[CrawlResult]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(results).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        write_atomic(&self.path, &json)
    }
}

impl HistoryStore for JsonFileStore {
    fn save(&self, result: &CrawlResult) -> Result<(), StoreError> {
        let mut results = self.list()?;
        results.retain(|r| r.id != result.id);
        results.insert(0, result.clone());
        self.write_all(&results)
    }

    fn list(&self) -> Result<Vec<CrawlResult>, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut results = self.list()?;
        let before = results.len();
        results.retain(|r| r.id != id);
        if results.len() == before {
            return Ok(false);
        }
        self.write_all(&results)?;
        Ok(true)
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::{CrawlConfig, ResultAggregator};
    use crate::scan::scan;

    fn result(seed: &str) -> CrawlResult {
        let config = CrawlConfig::builder(seed).build().unwrap();
        let mut agg = ResultAggregator::start();
        agg.record_scanned(seed, "Home".to_string(), scan("<p>Lorem ipsum</p>"));
        agg.finish(config)
    }

    #[test]
    fn test_empty_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        assert!(store.list().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_lists_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        let first = result("https://one.test/");
        let second = result("https://two.test/");
        store.save(&first).unwrap();
        store.save(&second).unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1], first);
    }

    #[test]
    fn test_save_replaces_same_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        let r = result("https://one.test/");
        store.save(&r).unwrap();
        store.save(&r).unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_get_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        let r = result("https://one.test/");
        store.save(&r).unwrap();

        assert_eq!(store.get(&r.id).unwrap().unwrap().id, r.id);
        assert!(store.delete(&r.id).unwrap());
        assert!(!store.delete(&r.id).unwrap());
        assert!(store.get(&r.id).unwrap().is_none());
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        store.save(&result("https://one.test/")).unwrap();
        store.clear().unwrap();
        assert!(store.list().unwrap().is_empty());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        std::fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.list(), Err(StoreError::Json { .. })));
    }
}
