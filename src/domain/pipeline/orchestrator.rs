//! Query orchestrator
//!
//! A query runs through a fixed sequence of steps:
//!
//! ```text
//! cache lookup -> embed -> vector search -> extract entities -> graph fetch
//!              -> build prompt -> generate -> cache write
//! ```
//!
//! A cache hit returns immediately. After a miss no step is fatal: each
//! failing retrieval step is logged and replaced by an empty result, and
//! generation always produces text.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::domain::cache::CacheStore;
use crate::domain::embedding::Embedder;
use crate::domain::entity::EntityExtractor;
use crate::domain::generation::FallbackGenerator;
use crate::domain::graph::{CityRecord, KnowledgeGraph};
use crate::domain::prompt::PromptBuilder;
use crate::domain::vector::{VectorIndex, VectorMatch, DEFAULT_TOP_K};
use crate::domain::DomainError;

/// Retrieval settings for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Nearest neighbours requested from the vector index
    pub top_k: usize,
    /// Upper bound on each vector or graph call
    pub retrieval_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            retrieval_timeout: Duration::from_secs(15),
        }
    }
}

/// Everything the pipeline talks to, built once at startup
pub struct PipelineDeps {
    pub cache: Arc<dyn CacheStore>,
    pub embedder: Arc<dyn Embedder>,
    pub vector_index: Arc<dyn VectorIndex>,
    pub graph: Arc<dyn KnowledgeGraph>,
    pub extractor: EntityExtractor,
    pub prompt_builder: PromptBuilder,
    pub generator: FallbackGenerator,
}

/// Result of the graph step. `Empty` and `Failed` are reported separately
/// but both leave the prompt without graph context.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphOutcome {
    Found(Vec<CityRecord>),
    Empty,
    Failed,
}

impl GraphOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            GraphOutcome::Found(_) => "found",
            GraphOutcome::Empty => "empty",
            GraphOutcome::Failed => "failed",
        }
    }

    pub fn into_records(self) -> Vec<CityRecord> {
        match self {
            GraphOutcome::Found(records) => records,
            GraphOutcome::Empty | GraphOutcome::Failed => Vec::new(),
        }
    }
}

/// Turns a free-text travel question into an itinerary
pub struct HybridPipeline {
    cache: Arc<dyn CacheStore>,
    embedder: Arc<dyn Embedder>,
    vector_index: Arc<dyn VectorIndex>,
    graph: Arc<dyn KnowledgeGraph>,
    extractor: EntityExtractor,
    prompt_builder: PromptBuilder,
    generator: FallbackGenerator,
    config: PipelineConfig,
}

impl std::fmt::Debug for HybridPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridPipeline")
            .field("cache", &self.cache.backend_name())
            .field("embedder", &self.embedder.model_id())
            .field("generator", &self.generator)
            .field("config", &self.config)
            .finish()
    }
}

impl HybridPipeline {
    pub fn new(deps: PipelineDeps, config: PipelineConfig) -> Self {
        Self {
            cache: deps.cache,
            embedder: deps.embedder,
            vector_index: deps.vector_index,
            graph: deps.graph,
            extractor: deps.extractor,
            prompt_builder: deps.prompt_builder,
            generator: deps.generator,
            config,
        }
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    pub fn vector_index(&self) -> &Arc<dyn VectorIndex> {
        &self.vector_index
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Reject blank input, then run the trimmed query through [`process_query`].
    ///
    /// [`process_query`]: HybridPipeline::process_query
    pub async fn answer(&self, query: &str) -> Result<String, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::validation("Query must not be empty"));
        }

        Ok(self.process_query(query).await)
    }

    /// Answer `query`, from the cache when possible. Always returns text.
    pub async fn process_query(&self, query: &str) -> String {
        let start = Instant::now();

        match self.cache.get(query).await {
            Ok(Some(response)) => {
                counter!("pipeline_cache_total", "result" => "hit").increment(1);
                info!(backend = self.cache.backend_name(), "Cache hit");
                return response;
            }
            Ok(None) => {
                counter!("pipeline_cache_total", "result" => "miss").increment(1);
                debug!("Cache miss");
            }
            Err(e) => {
                counter!("pipeline_cache_total", "result" => "error").increment(1);
                warn!(error = %e, "Cache lookup failed, treating as miss");
            }
        }

        let matches = self.semantic_search(query).await;

        let entities: Vec<String> = self.extractor.extract(&matches).into_iter().collect();
        debug!(entities = ?entities, "Extracted entities");

        let outcome = self.graph_context(&entities).await;
        counter!("pipeline_graph_total", "outcome" => outcome.label()).increment(1);
        let records = outcome.into_records();

        let request = self.prompt_builder.build(query, &matches, &records);
        let result = self.generator.generate(&request).await;

        if let Err(e) = self.cache.put(query, &result.text).await {
            warn!(error = %e, "Failed to persist response to cache");
        }

        let elapsed = start.elapsed();
        histogram!("pipeline_duration_seconds").record(elapsed.as_secs_f64());
        info!(
            matches = matches.len(),
            cities = records.len(),
            day_count = request.day_count,
            model = result.model.as_deref().unwrap_or("static-fallback"),
            latency_ms = elapsed.as_millis() as u64,
            "Query processed"
        );

        result.text
    }

    /// Embed the query and look up its nearest neighbours; any failure
    /// yields no matches
    async fn semantic_search(&self, query: &str) -> Vec<VectorMatch> {
        let vector = match self.embedder.embed(query).await {
            Ok(vector) => vector,
            Err(e) => {
                counter!("pipeline_vector_total", "outcome" => "embedding_failed").increment(1);
                warn!(error = %e, "Embedding failed, continuing without semantic context");
                return Vec::new();
            }
        };

        let search = self.vector_index.search(&vector, self.config.top_k);
        match self.bounded("vector search", DomainError::vector_search, search).await {
            Ok(matches) => {
                let outcome = if matches.is_empty() { "empty" } else { "found" };
                counter!("pipeline_vector_total", "outcome" => outcome).increment(1);
                debug!(count = matches.len(), "Vector search complete");
                matches
            }
            Err(e) => {
                counter!("pipeline_vector_total", "outcome" => "failed").increment(1);
                warn!(error = %e, "Vector search failed, continuing without semantic context");
                Vec::new()
            }
        }
    }

    async fn graph_context(&self, names: &[String]) -> GraphOutcome {
        let fetch = self.graph.fetch_context(names);
        match self.bounded("graph fetch", DomainError::graph, fetch).await {
            Ok(records) if records.is_empty() => {
                info!(names = ?names, "Graph returned no cities");
                GraphOutcome::Empty
            }
            Ok(records) => {
                debug!(count = records.len(), "Graph fetch complete");
                GraphOutcome::Found(records)
            }
            Err(e) => {
                warn!(error = %e, "Graph fetch failed, continuing without graph context");
                GraphOutcome::Failed
            }
        }
    }

    /// Run a retrieval step under the retrieval timeout; `on_timeout` builds
    /// the step's own error kind
    async fn bounded<T, F>(
        &self,
        step: &str,
        on_timeout: fn(String) -> DomainError,
        fut: F,
    ) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        match timeout(self.config.retrieval_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(on_timeout(format!(
                "{} timed out after {}ms",
                step,
                self.config.retrieval_timeout.as_millis()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockCacheStore;
    use crate::domain::embedding::{HashEmbedder, MockEmbedder};
    use crate::domain::generation::{fallback_itinerary, GenerationConfig};
    use crate::domain::graph::MockKnowledgeGraph;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::vector::MockVectorIndex;

    const MODEL: &str = "test-model";

    fn generator(provider: MockLlmProvider) -> FallbackGenerator {
        FallbackGenerator::new(
            Arc::new(provider),
            GenerationConfig {
                models: vec![MODEL.to_string()],
                timeout: Duration::from_secs(1),
                ..Default::default()
            },
        )
    }

    fn hanoi() -> CityRecord {
        CityRecord {
            name: "Hanoi".to_string(),
            description: "Capital".to_string(),
            region: "North".to_string(),
            best_time: "Oct-Dec".to_string(),
            tags: vec!["culture".to_string()],
            connected_cities: vec!["Ha Long Bay".to_string()],
        }
    }

    fn pipeline(
        cache: MockCacheStore,
        embedder: Arc<dyn Embedder>,
        vector_index: MockVectorIndex,
        graph: MockKnowledgeGraph,
        provider: MockLlmProvider,
    ) -> HybridPipeline {
        HybridPipeline::new(
            PipelineDeps {
                cache: Arc::new(cache),
                embedder,
                vector_index: Arc::new(vector_index),
                graph: Arc::new(graph),
                extractor: EntityExtractor::new(),
                prompt_builder: PromptBuilder::new(),
                generator: generator(provider),
            },
            PipelineConfig {
                top_k: 5,
                retrieval_timeout: Duration::from_millis(200),
            },
        )
    }

    fn miss_cache() -> MockCacheStore {
        let mut cache = MockCacheStore::new();
        cache.expect_get().returning(|_| Ok(None));
        cache.expect_backend_name().return_const("mock");
        cache
    }

    #[tokio::test]
    async fn test_cache_hit_skips_every_client() {
        let mut cache = MockCacheStore::new();
        cache
            .expect_get()
            .withf(|q| q == "Plan a trip")
            .times(1)
            .returning(|_| Ok(Some("cached itinerary".to_string())));
        cache.expect_backend_name().return_const("mock");
        cache.expect_put().never();

        let mut embedder = MockEmbedder::new();
        embedder.expect_embed().never();
        let mut vector_index = MockVectorIndex::new();
        vector_index.expect_search().never();
        let mut graph = MockKnowledgeGraph::new();
        graph.expect_fetch_context().never();
        let provider = MockLlmProvider::new();

        let pipeline = pipeline(cache, Arc::new(embedder), vector_index, graph, provider);

        assert_eq!(pipeline.process_query("Plan a trip").await, "cached itinerary");
    }

    #[tokio::test]
    async fn test_full_miss_path_writes_cache() {
        let mut cache = miss_cache();
        cache
            .expect_put()
            .withf(|q, r| q == "Romantic 3 day trip" && r == "# Day 1")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut vector_index = MockVectorIndex::new();
        vector_index
            .expect_search()
            .withf(|v, k| v.len() == 8 && *k == 5)
            .times(1)
            .returning(|_, _| Ok(vec![VectorMatch::new("hue", "Imperial Hue citadel", 0.82)]));

        let mut graph = MockKnowledgeGraph::new();
        graph
            .expect_fetch_context()
            .withf(|names| names == ["Hue".to_string()])
            .times(1)
            .returning(|_| Ok(vec![hanoi()]));

        let provider = MockLlmProvider::new().with_response(MODEL, "# Day 1");

        let pipeline = pipeline(
            cache,
            Arc::new(HashEmbedder::new(8)),
            vector_index,
            graph,
            provider,
        );

        assert_eq!(pipeline.process_query("Romantic 3 day trip").await, "# Day 1");
    }

    #[tokio::test]
    async fn test_vector_failure_degrades_to_default_anchors() {
        let mut cache = miss_cache();
        cache.expect_put().returning(|_, _| Ok(()));

        let mut vector_index = MockVectorIndex::new();
        vector_index
            .expect_search()
            .returning(|_, _| Err(DomainError::vector_search("connection reset")));

        let mut graph = MockKnowledgeGraph::new();
        graph
            .expect_fetch_context()
            .withf(|names| names == ["Hanoi".to_string(), "Hoi An".to_string()])
            .times(1)
            .returning(|_| Ok(vec![]));

        let provider = MockLlmProvider::new().with_response(MODEL, "itinerary");

        let pipeline = pipeline(
            cache,
            Arc::new(HashEmbedder::new(8)),
            vector_index,
            graph,
            provider,
        );

        let response = pipeline.process_query("Plan a trip").await;
        assert!(!response.is_empty());
    }

    #[tokio::test]
    async fn test_embedding_failure_skips_vector_search() {
        let mut cache = miss_cache();
        cache.expect_put().returning(|_, _| Ok(()));

        let mut embedder = MockEmbedder::new();
        embedder
            .expect_embed()
            .returning(|_| Err(DomainError::embedding("model not loaded")));
        embedder.expect_model_id().return_const("mock-embedder".to_string());

        let mut vector_index = MockVectorIndex::new();
        vector_index.expect_search().never();

        let mut graph = MockKnowledgeGraph::new();
        graph.expect_fetch_context().returning(|_| Ok(vec![hanoi()]));

        let provider = MockLlmProvider::new().with_response(MODEL, "itinerary");

        let pipeline = pipeline(cache, Arc::new(embedder), vector_index, graph, provider);

        assert_eq!(pipeline.process_query("Plan a trip").await, "itinerary");
    }

    #[tokio::test]
    async fn test_everything_failing_still_returns_fallback() {
        let mut cache = MockCacheStore::new();
        cache
            .expect_get()
            .returning(|_| Err(DomainError::cache("corrupt")));
        cache
            .expect_put()
            .returning(|_, _| Err(DomainError::cache("read-only filesystem")));
        cache.expect_backend_name().return_const("mock");

        let mut vector_index = MockVectorIndex::new();
        vector_index
            .expect_search()
            .returning(|_, _| Err(DomainError::vector_search("503")));

        let mut graph = MockKnowledgeGraph::new();
        graph
            .expect_fetch_context()
            .returning(|_| Err(DomainError::graph("bolt handshake failed")));

        let provider = MockLlmProvider::new().with_error(MODEL, "HTTP 500");

        let pipeline = pipeline(
            cache,
            Arc::new(HashEmbedder::new(8)),
            vector_index,
            graph,
            provider,
        );

        assert_eq!(
            pipeline.process_query("Plan a 5-day trip").await,
            fallback_itinerary(5)
        );
    }

    #[tokio::test]
    async fn test_graph_outcomes() {
        let mut graph = MockKnowledgeGraph::new();
        let mut seq = mockall::Sequence::new();
        graph
            .expect_fetch_context()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![hanoi()]));
        graph
            .expect_fetch_context()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![]));
        graph
            .expect_fetch_context()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(DomainError::graph("down")));

        let pipeline = pipeline(
            miss_cache(),
            Arc::new(HashEmbedder::new(8)),
            MockVectorIndex::new(),
            graph,
            MockLlmProvider::new(),
        );
        let names = vec!["Hanoi".to_string()];

        assert_eq!(
            pipeline.graph_context(&names).await,
            GraphOutcome::Found(vec![hanoi()])
        );
        assert_eq!(pipeline.graph_context(&names).await, GraphOutcome::Empty);
        assert_eq!(pipeline.graph_context(&names).await, GraphOutcome::Failed);
    }

    #[tokio::test]
    async fn test_slow_step_is_bounded() {
        let pipeline = pipeline(
            miss_cache(),
            Arc::new(HashEmbedder::new(8)),
            MockVectorIndex::new(),
            MockKnowledgeGraph::new(),
            MockLlmProvider::new(),
        );

        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, DomainError>(())
        };
        let result = pipeline.bounded("graph fetch", DomainError::graph, slow).await;

        let error = result.unwrap_err();
        assert!(matches!(error, DomainError::Graph { .. }));
        assert!(error.is_retrieval());
        assert!(error.to_string().contains("graph fetch timed out"));
    }

    #[tokio::test]
    async fn test_answer_rejects_blank_query() {
        let mut cache = MockCacheStore::new();
        cache.expect_get().never();

        let pipeline = pipeline(
            cache,
            Arc::new(HashEmbedder::new(8)),
            MockVectorIndex::new(),
            MockKnowledgeGraph::new(),
            MockLlmProvider::new(),
        );

        let error = pipeline.answer("   ").await.unwrap_err();
        assert!(matches!(error, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_answer_trims_before_lookup() {
        let mut cache = MockCacheStore::new();
        cache
            .expect_get()
            .withf(|q| q == "Hue in 2 days")
            .times(1)
            .returning(|_| Ok(Some("cached".to_string())));
        cache.expect_backend_name().return_const("mock");

        let pipeline = pipeline(
            cache,
            Arc::new(HashEmbedder::new(8)),
            MockVectorIndex::new(),
            MockKnowledgeGraph::new(),
            MockLlmProvider::new(),
        );

        assert_eq!(pipeline.answer("  Hue in 2 days\n").await.unwrap(), "cached");
    }
}
