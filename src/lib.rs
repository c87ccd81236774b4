//! Hybrid Travel Assistant
//!
//! Answers free-text travel questions with a day-by-day itinerary built from:
//! - Semantic search over a Pinecone index of place descriptions
//! - One-hop city context from a Neo4j knowledge graph
//! - An ordered list of chat-completion backends with a static fallback
//! - A persistent query → response cache in front of all of it

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use domain::{
    EntityExtractor, FallbackGenerator, GenerationConfig, HybridPipeline, PipelineConfig,
    PipelineDeps, PromptBuilder,
};
use infrastructure::{
    cache::CacheFactory,
    embedding::FastEmbedder,
    graph::Neo4jKnowledgeGraph,
    llm::{HttpClient, HuggingFaceProvider},
    vector::PineconeIndex,
};

/// Load the local embedding model named by the configuration
pub async fn build_embedder(config: &AppConfig) -> anyhow::Result<FastEmbedder> {
    FastEmbedder::load(config.embedding.model_dir.clone())
        .await
        .with_context(|| {
            format!(
                "Failed to load embedding model from {}",
                config.embedding.model_dir.display()
            )
        })
}

/// Pinecone data-plane client with the configured request timeout
pub fn build_vector_index(config: &AppConfig) -> anyhow::Result<PineconeIndex<HttpClient>> {
    let client = HttpClient::with_timeout(std::time::Duration::from_secs(
        config.vector.timeout_secs,
    ))?;

    Ok(PineconeIndex::new(
        client,
        config.vector.api_key.clone(),
        config.vector.host.clone(),
    ))
}

pub async fn connect_graph(config: &AppConfig) -> anyhow::Result<Neo4jKnowledgeGraph> {
    Neo4jKnowledgeGraph::connect(&config.neo4j_config())
        .await
        .context("Failed to connect to the knowledge graph")
}

/// Build every client once and wire them into a pipeline
pub async fn build_pipeline(config: &AppConfig) -> anyhow::Result<HybridPipeline> {
    config.validate()?;

    let cache = CacheFactory::new().create(&config.cache_config()?).await?;
    let embedder = build_embedder(config).await?;
    let vector_index = build_vector_index(config)?;
    let graph = connect_graph(config).await?;

    let generation = &config.generation;
    let generation_timeout = std::time::Duration::from_secs(generation.timeout_secs);
    let provider = HuggingFaceProvider::with_base_url(
        HttpClient::with_timeout(generation_timeout)?,
        generation.api_token.clone(),
        generation.base_url.clone(),
    );
    let generator = FallbackGenerator::new(
        Arc::new(provider),
        GenerationConfig {
            models: generation.models.clone(),
            temperature: generation.temperature,
            max_tokens: generation.max_tokens,
            timeout: generation_timeout,
        },
    );

    info!(
        cache = cache.backend_name(),
        models = ?generation.models,
        top_k = config.vector.top_k,
        "Pipeline ready"
    );

    Ok(HybridPipeline::new(
        PipelineDeps {
            cache,
            embedder: Arc::new(embedder),
            vector_index: Arc::new(vector_index),
            graph: Arc::new(graph),
            extractor: EntityExtractor::new(),
            prompt_builder: PromptBuilder::new(),
            generator,
        },
        PipelineConfig {
            top_k: config.vector.top_k,
            retrieval_timeout: config.retrieval_timeout(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::mock::test_state;
    use crate::domain::CacheStore;
    use crate::infrastructure::cache::JsonFileCacheStore;

    #[tokio::test]
    async fn test_answer_is_visible_after_reopening_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query_cache.json");

        let cache = Arc::new(JsonFileCacheStore::open(&path).await.unwrap());
        let state = test_state(cache, "## Day 1\nImperial City");
        let response = state.pipeline.answer("Two days in Hue").await.unwrap();
        drop(state);

        let reopened = JsonFileCacheStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("Two days in Hue").await.unwrap(),
            Some(response)
        );
    }

    #[tokio::test]
    async fn test_build_pipeline_rejects_invalid_config() {
        let error = build_pipeline(&AppConfig::default()).await.unwrap_err();

        assert!(error.to_string().contains("vector.api_key"));
    }
}
