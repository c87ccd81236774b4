//! Cache factory for runtime selection

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::cache::CacheStore;
use crate::domain::DomainError;

use super::in_memory::InMemoryCacheStore;
use super::json_file::JsonFileCacheStore;

/// Default location of the persisted response cache
pub const DEFAULT_CACHE_FILE: &str = "query_cache.json";

/// Supported cache types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheType {
    /// JSON file on disk, survives restarts
    #[default]
    File,
    /// In-process moka cache, lost on exit
    Memory,
}

impl std::fmt::Display for CacheType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheType::File => write!(f, "file"),
            CacheType::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for CacheType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "json" => Ok(CacheType::File),
            "memory" | "in_memory" | "inmemory" => Ok(CacheType::Memory),
            _ => Err(DomainError::configuration(format!(
                "Unknown cache type: {}. Valid types: file, memory",
                s
            ))),
        }
    }
}

/// Configuration for cache factory
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Type of cache to create
    pub cache_type: CacheType,
    /// Cache file (file type only)
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_type: CacheType::File,
            path: PathBuf::from(DEFAULT_CACHE_FILE),
        }
    }
}

impl CacheConfig {
    /// Creates a new configuration for a file-backed cache
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            cache_type: CacheType::File,
            path: path.into(),
            ..Default::default()
        }
    }

    /// Creates a new configuration for an in-memory cache
    pub fn memory() -> Self {
        Self {
            cache_type: CacheType::Memory,
            ..Default::default()
        }
    }
}

/// Factory for creating cache instances
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates a cache instance based on configuration
    pub async fn create(&self, config: &CacheConfig) -> Result<Arc<dyn CacheStore>, DomainError> {
        match config.cache_type {
            CacheType::File => {
                let store = JsonFileCacheStore::open(&config.path).await?;
                Ok(Arc::new(store))
            }
            CacheType::Memory => Ok(Arc::new(InMemoryCacheStore::new())),
        }
    }
}
