//! Semantic vector index domain

mod search;

pub use search::{IndexStats, VectorIndex, VectorMatch, VectorRecord, DEFAULT_TOP_K};

#[cfg(test)]
pub use search::MockVectorIndex;
