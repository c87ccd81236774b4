//! Embedder trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Turns text into a fixed-dimension vector.
///
/// Implementations are deterministic for a fixed model. CPU-bound work must
/// not run on the async worker threads.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Embedder: Send + Sync + Debug {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Embed a batch of texts, preserving input order
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, DomainError>;

    /// Output dimension
    fn dimension(&self) -> usize;

    /// Stable model identifier
    fn model_id(&self) -> &str;
}

/// Scale a vector to unit length in place; zero vectors are left untouched
pub fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Deterministic embedder derived from a byte hash of the text
    #[derive(Debug)]
    pub struct HashEmbedder {
        dimension: usize,
    }

    impl HashEmbedder {
        pub fn new(dimension: usize) -> Self {
            Self { dimension }
        }

        fn vector_for(&self, text: &str) -> Vec<f32> {
            let hash = text.bytes().fold(0u64, |acc, b| {
                acc.wrapping_mul(31).wrapping_add(b as u64)
            });
            let mut vector: Vec<f32> = (0..self.dimension)
                .map(|i| ((hash.wrapping_add(i as u64) % 1000) as f32 / 1000.0) - 0.5)
                .collect();
            l2_normalize(&mut vector);
            vector
        }
    }

    #[async_trait]
    impl Embedder for HashEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
            Ok(self.vector_for(text))
        }

        async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, DomainError> {
            Ok(texts.iter().map(|t| self.vector_for(t)).collect())
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        fn model_id(&self) -> &str {
            "hash-embedder"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::HashEmbedder;
    use super::*;

    #[test]
    fn test_l2_normalize() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector() {
        let mut v = vec![0.0, 0.0, 0.0];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_hash_embedder_is_deterministic() {
        let embedder = HashEmbedder::new(384);

        let first = embedder.embed("romantic Hoi An").await.unwrap();
        let second = embedder.embed("romantic Hoi An").await.unwrap();

        assert_eq!(first.len(), 384);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_hash_embedder_batch_preserves_order() {
        let embedder = HashEmbedder::new(16);

        let batch = embedder
            .embed_batch(vec!["Hanoi".to_string(), "Hue".to_string()])
            .await
            .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1], embedder.embed("Hue").await.unwrap());
    }
}
