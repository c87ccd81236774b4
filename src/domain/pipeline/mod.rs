//! Hybrid retrieval pipeline - cache, semantic search, graph context and generation

mod orchestrator;

pub use orchestrator::{GraphOutcome, HybridPipeline, PipelineConfig, PipelineDeps};
