use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::generation::DEFAULT_MODELS;
use crate::domain::graph::{is_valid_relationship_type, DEFAULT_RELATIONSHIP};
use crate::domain::vector::DEFAULT_TOP_K;
use crate::domain::DomainError;
use crate::infrastructure::cache::{CacheConfig, CacheType, DEFAULT_CACHE_FILE};
use crate::infrastructure::embedding::EMBEDDING_DIMENSION;
use crate::infrastructure::graph::Neo4jConfig;
use crate::infrastructure::llm::DEFAULT_HF_ROUTER_URL;
use crate::infrastructure::observability::MetricsConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub vector: VectorSettings,
    #[serde(default)]
    pub graph: GraphSettings,
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub data: DataSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Response cache backend
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// `file` or `memory`
    pub backend: String,
    pub path: PathBuf,
}

/// Local embedding model
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Directory holding model.onnx and the tokenizer files
    pub model_dir: PathBuf,
    pub dimension: usize,
}

/// Pinecone index
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorSettings {
    pub api_key: String,
    /// Data-plane host of the index
    pub host: String,
    pub index_name: String,
    pub top_k: usize,
    pub timeout_secs: u64,
}

/// Neo4j connection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
    pub relationship: String,
    pub timeout_secs: u64,
}

/// Chat-completion backends
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub api_token: String,
    pub base_url: String,
    /// Tried in order until one answers
    pub models: Vec<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

/// Dataset ingestion
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub dataset_file: PathBuf,
    pub batch_size: usize,
    pub batch_pause_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            path: PathBuf::from(DEFAULT_CACHE_FILE),
        }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models/all-MiniLM-L6-v2"),
            dimension: EMBEDDING_DIMENSION,
        }
    }
}

impl Default for VectorSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            host: String::new(),
            index_name: "vietnam-travel".to_string(),
            top_k: DEFAULT_TOP_K,
            timeout_secs: 10,
        }
    }
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            database: "neo4j".to_string(),
            max_connections: 10,
            relationship: DEFAULT_RELATIONSHIP.to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: DEFAULT_HF_ROUTER_URL.to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout_secs: 60,
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dataset_file: PathBuf::from("data/vietnam_travel_dataset.json"),
            batch_size: 50,
            batch_pause_ms: 1000,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("generation.models"),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Check required endpoints and credentials before any client is built
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut problems = Vec::new();

        if self.vector.api_key.trim().is_empty() {
            problems.push("vector.api_key is required");
        }
        if self.vector.host.trim().is_empty() {
            problems.push("vector.host is required");
        }
        if self.vector.top_k == 0 {
            problems.push("vector.top_k must be at least 1");
        }
        if self.graph.uri.trim().is_empty() {
            problems.push("graph.uri is required");
        }
        if !is_valid_relationship_type(&self.graph.relationship) {
            problems.push("graph.relationship must be a plain identifier");
        }
        if self.generation.api_token.trim().is_empty() {
            problems.push("generation.api_token is required");
        }
        if self.generation.models.iter().all(|m| m.trim().is_empty()) {
            problems.push("generation.models must name at least one model");
        }
        if self.embedding.dimension != EMBEDDING_DIMENSION {
            problems.push("embedding.dimension must match the MiniLM model (384)");
        }
        if self.data.batch_size == 0 {
            problems.push("data.batch_size must be at least 1");
        }
        if self.cache.backend.parse::<CacheType>().is_err() {
            problems.push("cache.backend must be 'file' or 'memory'");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DomainError::configuration(problems.join("; ")))
        }
    }

    pub fn cache_config(&self) -> Result<CacheConfig, DomainError> {
        Ok(CacheConfig {
            cache_type: self.cache.backend.parse()?,
            path: self.cache.path.clone(),
        })
    }

    pub fn neo4j_config(&self) -> Neo4jConfig {
        Neo4jConfig {
            uri: self.graph.uri.clone(),
            user: self.graph.user.clone(),
            password: self.graph.password.clone(),
            database: self.graph.database.clone(),
            max_connections: self.graph.max_connections,
            relationship: self.graph.relationship.clone(),
        }
    }

    /// Bound on a single vector or graph call
    pub fn retrieval_timeout(&self) -> Duration {
        Duration::from_secs(self.vector.timeout_secs.max(self.graph.timeout_secs))
    }
}
