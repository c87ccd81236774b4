//! Local MiniLM embedder backed by fastembed
//!
//! The ONNX model and tokenizer bundle are read from a local directory; the
//! embedder never downloads anything. Inference runs on the blocking pool.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{
    InitOptionsUserDefined, Pooling, TextEmbedding, TokenizerFiles, UserDefinedEmbeddingModel,
};
use tracing::info;

use crate::domain::embedding::{l2_normalize, Embedder};
use crate::domain::DomainError;

/// Output dimension of all-MiniLM-L6-v2
pub const EMBEDDING_DIMENSION: usize = 384;

const MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

const MODEL_FILE: &str = "model.onnx";
const TOKENIZER_JSON: &str = "tokenizer.json";
const CONFIG_JSON: &str = "config.json";
const SPECIAL_TOKENS_JSON: &str = "special_tokens_map.json";
const TOKENIZER_CONFIG_JSON: &str = "tokenizer_config.json";

/// Files that must exist in the model directory
pub const REQUIRED_MODEL_FILES: &[&str] = &[
    MODEL_FILE,
    TOKENIZER_JSON,
    CONFIG_JSON,
    SPECIAL_TOKENS_JSON,
    TOKENIZER_CONFIG_JSON,
];

pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
    dimension: usize,
}

impl std::fmt::Debug for FastEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedder")
            .field("model_id", &MODEL_ID)
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl FastEmbedder {
    /// Load the model from `model_dir` on the blocking pool
    pub async fn load(model_dir: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let model_dir = model_dir.into();

        tokio::task::spawn_blocking(move || Self::load_from_dir(&model_dir))
            .await
            .map_err(|e| DomainError::embedding(format!("Model loading task failed: {}", e)))?
    }

    /// Load the model synchronously
    pub fn load_from_dir(model_dir: &Path) -> Result<Self, DomainError> {
        if !model_dir.is_dir() {
            return Err(DomainError::embedding(format!(
                "Model directory not found: {}",
                model_dir.display()
            )));
        }

        let missing: Vec<&str> = REQUIRED_MODEL_FILES
            .iter()
            .copied()
            .filter(|name| !model_dir.join(name).is_file())
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::embedding(format!(
                "Model files missing in {}: {}",
                model_dir.display(),
                missing.join(", ")
            )));
        }

        let tokenizer_files = TokenizerFiles {
            tokenizer_file: read_required(model_dir, TOKENIZER_JSON)?,
            config_file: read_required(model_dir, CONFIG_JSON)?,
            special_tokens_map_file: read_required(model_dir, SPECIAL_TOKENS_JSON)?,
            tokenizer_config_file: read_required(model_dir, TOKENIZER_CONFIG_JSON)?,
        };

        let mut model =
            UserDefinedEmbeddingModel::new(read_required(model_dir, MODEL_FILE)?, tokenizer_files);
        model.pooling = Some(Pooling::Mean);

        let model = TextEmbedding::try_new_from_user_defined(model, InitOptionsUserDefined::new())
            .map_err(|e| DomainError::embedding(format!("fastembed init failed: {}", e)))?;

        info!(model = MODEL_ID, dir = %model_dir.display(), "Embedding model loaded");

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            dimension: EMBEDDING_DIMENSION,
        })
    }

    async fn run(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let dimension = self.dimension;

        tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| DomainError::embedding("fastembed lock poisoned"))?;

            let mut embeddings = model
                .embed(texts, None)
                .map_err(|e| DomainError::embedding(format!("fastembed embed failed: {}", e)))?;

            for embedding in embeddings.iter_mut() {
                if embedding.len() != dimension {
                    return Err(DomainError::embedding(format!(
                        "Dimension mismatch: expected {}, got {}",
                        dimension,
                        embedding.len()
                    )));
                }
                l2_normalize(embedding);
            }

            Ok(embeddings)
        })
        .await
        .map_err(|e| DomainError::embedding(format!("Embedding task failed: {}", e)))?
    }
}

fn read_required(dir: &Path, name: &str) -> Result<Vec<u8>, DomainError> {
    let path = dir.join(name);
    std::fs::read(&path).map_err(|e| {
        DomainError::embedding(format!("Unable to read {} at {}: {}", name, path.display(), e))
    })
}

#[async_trait]
impl Embedder for FastEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::embedding("Cannot embed empty text"));
        }

        self.run(vec![text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::embedding("fastembed returned no embedding"))
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, DomainError> {
        let count = texts.len();
        let embeddings = self.run(texts).await?;

        if embeddings.len() != count {
            return Err(DomainError::embedding(format!(
                "fastembed returned {} embeddings for {} texts",
                embeddings.len(),
                count
            )));
        }

        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        MODEL_ID
    }
}
