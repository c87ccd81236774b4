//! Cache store trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Persistent map from raw query text to the response returned for it.
///
/// Entries never expire; a stored response is returned verbatim until the
/// store is cleared. Keys are compared byte-for-byte, no normalization.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CacheStore: Send + Sync + Debug {
    /// Looks up the response cached for `query`
    async fn get(&self, query: &str) -> Result<Option<String>, DomainError>;

    /// Stores `response` for `query`, replacing any previous value
    async fn put(&self, query: &str, response: &str) -> Result<(), DomainError>;

    /// Removes every entry
    async fn clear(&self) -> Result<(), DomainError>;

    /// Number of cached queries
    async fn size(&self) -> Result<usize, DomainError>;

    /// Backend name for logs and health checks
    fn backend_name(&self) -> &'static str;
}
