//! File-backed response cache
//!
//! The whole map lives in one JSON object file (`{"query": "response", ...}`).
//! It is read once when the store is opened and rewritten on every change.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::cache::CacheStore;
use crate::domain::DomainError;

/// JSON file cache. Writers inside one process are serialized by the lock;
/// separate processes sharing a file can still lose each other's updates.
#[derive(Debug)]
pub struct JsonFileCacheStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl JsonFileCacheStore {
    /// Open the cache at `path`. A missing or unreadable file starts empty.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();
        let entries = load_entries(&path).await;

        debug!(path = %path.display(), entries = entries.len(), "Opened cache file");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &HashMap<String, String>) -> Result<(), DomainError> {
        let json = serde_json::to_vec(entries)
            .map_err(|e| DomainError::cache(format!("Failed to serialize cache: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::cache(format!(
                    "Failed to create cache directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json).await.map_err(|e| {
            DomainError::cache(format!("Failed to write {}: {}", temp_path.display(), e))
        })?;
        tokio::fs::rename(&temp_path, &self.path).await.map_err(|e| {
            DomainError::cache(format!("Failed to replace {}: {}", self.path.display(), e))
        })
    }
}

async fn load_entries(path: &Path) -> HashMap<String, String> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read cache file, starting empty");
            return HashMap::new();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cache file is corrupt, starting empty");
            HashMap::new()
        }
    }
}

#[async_trait]
impl CacheStore for JsonFileCacheStore {
    async fn get(&self, query: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.read().await.get(query).cloned())
    }

    async fn put(&self, query: &str, response: &str) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        entries.insert(query.to_string(), response.to_string());
        self.persist(&entries).await
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        entries.clear();

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::cache(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn size(&self) -> Result<usize, DomainError> {
        Ok(self.entries.read().await.len())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileCacheStore::open(dir.path().join("cache.json"))
            .await
            .unwrap();

        assert_eq!(store.size().await.unwrap(), 0);
        assert_eq!(store.get("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, b"\x80not json").unwrap();

        let store = JsonFileCacheStore::open(&path).await.unwrap();

        assert_eq!(store.size().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_put_is_visible_after_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let store = JsonFileCacheStore::open(&path).await.unwrap();
        store.put("Plan a 3-day trip", "# Day 1").await.unwrap();
        drop(store);

        let reopened = JsonFileCacheStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("Plan a 3-day trip").await.unwrap(),
            Some("# Day 1".to_string())
        );
    }

    #[tokio::test]
    async fn test_file_is_a_json_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let store = JsonFileCacheStore::open(&path).await.unwrap();
        store.put("q", "r").await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"q": "r"}));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        let store = JsonFileCacheStore::open(&path).await.unwrap();
        store.put("q", "r").await.unwrap();

        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_clear_removes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let store = JsonFileCacheStore::open(&path).await.unwrap();
        store.put("q", "r").await.unwrap();
        store.clear().await.unwrap();

        assert!(!path.exists());
        assert_eq!(store.get("q").await.unwrap(), None);

        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_write_failure_surfaces_as_cache_error() {
        let dir = tempdir().unwrap();
        // A directory where the file should be makes the rename fail
        let path = dir.path().join("cache.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();

        let store = JsonFileCacheStore::open(&path).await.unwrap();
        let error = store.put("q", "r").await.unwrap_err();

        assert!(matches!(error, DomainError::Cache { .. }));
        assert_eq!(store.get("q").await.unwrap(), Some("r".to_string()));
    }
}
