//! Embedding implementations

mod minilm;

pub use minilm::{FastEmbedder, EMBEDDING_DIMENSION, REQUIRED_MODEL_FILES};
