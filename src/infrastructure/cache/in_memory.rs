//! In-memory response cache using moka

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::cache::CacheStore;
use crate::domain::DomainError;

/// Process-lifetime cache. Unbounded with no TTL, so an entry stays until
/// `clear`.
#[derive(Debug, Clone)]
pub struct InMemoryCacheStore {
    cache: MokaCache<String, String>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self {
            cache: MokaCache::builder().build(),
        }
    }
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, query: &str) -> Result<Option<String>, DomainError> {
        Ok(self.cache.get(query).await)
    }

    async fn put(&self, query: &str, response: &str) -> Result<(), DomainError> {
        self.cache
            .insert(query.to_string(), response.to_string())
            .await;
        Ok(())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn size(&self) -> Result<usize, DomainError> {
        self.cache.run_pending_tasks().await;
        Ok(self.cache.entry_count() as usize)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
