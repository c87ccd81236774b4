//! Application state shared by the handlers

use std::sync::Arc;

use crate::domain::HybridPipeline;

/// Built once at startup; cloning only bumps the reference count
#[derive(Clone, Debug)]
pub struct AppState {
    pub pipeline: Arc<HybridPipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<HybridPipeline>) -> Self {
        Self { pipeline }
    }
}

#[cfg(test)]
pub mod mock {
    use std::time::Duration;

    use super::*;
    use crate::domain::cache::CacheStore;
    use crate::domain::embedding::HashEmbedder;
    use crate::domain::graph::MockKnowledgeGraph;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::vector::MockVectorIndex;
    use crate::domain::{
        EntityExtractor, FallbackGenerator, GenerationConfig, PipelineConfig, PipelineDeps,
        PromptBuilder,
    };

    pub const TEST_MODEL: &str = "test-model";

    /// State over `cache` whose retrieval steps find nothing and whose only
    /// backend answers with `answer`
    pub fn test_state(cache: Arc<dyn CacheStore>, answer: &str) -> AppState {
        let mut vector_index = MockVectorIndex::new();
        vector_index.expect_search().returning(|_, _| Ok(vec![]));
        let mut graph = MockKnowledgeGraph::new();
        graph.expect_fetch_context().returning(|_| Ok(vec![]));

        let generator = FallbackGenerator::new(
            Arc::new(MockLlmProvider::new().with_response(TEST_MODEL, answer)),
            GenerationConfig {
                models: vec![TEST_MODEL.to_string()],
                timeout: Duration::from_secs(1),
                ..Default::default()
            },
        );

        let pipeline = HybridPipeline::new(
            PipelineDeps {
                cache,
                embedder: Arc::new(HashEmbedder::new(8)),
                vector_index: Arc::new(vector_index),
                graph: Arc::new(graph),
                extractor: EntityExtractor::new(),
                prompt_builder: PromptBuilder::new(),
                generator,
            },
            PipelineConfig::default(),
        );

        AppState::new(Arc::new(pipeline))
    }
}
