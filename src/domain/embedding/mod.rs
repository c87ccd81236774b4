//! Text embedding domain models and traits

mod embedder;

pub use embedder::{l2_normalize, Embedder};

#[cfg(test)]
pub use embedder::mock::HashEmbedder;
#[cfg(test)]
pub use embedder::MockEmbedder;
