//! Vector index trait and match types

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Number of nearest neighbours requested when the caller does not say
pub const DEFAULT_TOP_K: usize = 5;

/// A single nearest-neighbour hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMatch {
    pub id: String,
    /// Text stored with the vector; empty when the index returned no metadata
    pub text: String,
    pub score: f32,
}

impl VectorMatch {
    pub fn new(id: impl Into<String>, text: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            score,
        }
    }
}

/// A vector to be written to the index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl VectorRecord {
    /// Record carrying its source text in the `text` metadata field
    pub fn with_text(id: impl Into<String>, values: Vec<f32>, text: impl Into<String>) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("text".to_string(), serde_json::Value::String(text.into()));

        Self {
            id: id.into(),
            values,
            metadata,
        }
    }
}

/// Index statistics used by the startup check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub dimension: usize,
    pub total_vector_count: u64,
}

/// Remote similarity index
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VectorIndex: Send + Sync + Debug {
    /// Nearest neighbours of `vector`, best first, at most `top_k`
    async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, DomainError>;

    /// Insert or overwrite records, returning how many were written
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, DomainError>;

    /// Index dimension and size
    async fn stats(&self) -> Result<IndexStats, DomainError>;
}
