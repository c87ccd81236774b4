//! Domain layer - Core business logic and entities

pub mod cache;
pub mod dataset;
pub mod embedding;
pub mod entity;
pub mod error;
pub mod generation;
pub mod graph;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod vector;

pub use cache::CacheStore;
pub use dataset::{CityNode, Connection};
pub use embedding::Embedder;
pub use entity::EntityExtractor;
pub use error::DomainError;
pub use generation::{FallbackGenerator, GenerationConfig, GenerationResult};
pub use graph::{CityRecord, KnowledgeGraph};
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, Message, MessageRole,
    Usage,
};
pub use pipeline::{GraphOutcome, HybridPipeline, PipelineConfig, PipelineDeps};
pub use prompt::{GenerationRequest, PromptBuilder, PromptTemplate};
pub use vector::{IndexStats, VectorIndex, VectorMatch, VectorRecord};
