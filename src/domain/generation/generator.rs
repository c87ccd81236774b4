//! Fallback generator - tries each configured model once, in order

use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::counter;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::fallback::fallback_itinerary;
use crate::domain::prompt::GenerationRequest;
use crate::domain::{DomainError, FinishReason, LlmProvider, LlmRequest, LlmResponse};

/// Models tried when configuration does not name any
pub const DEFAULT_MODELS: [&str; 2] = [
    "HuggingFaceTB/SmolLM3-3B:hf-inference",
    "katanemo/Arch-Router-1.5B:hf-inference",
];

/// Generation parameters shared by every backend call
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Backend model ids in priority order
    pub models: Vec<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on a single backend call
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Outcome of one backend attempt
#[derive(Debug, Clone)]
pub struct AttemptResult {
    pub model: String,
    pub success: bool,
    pub latency_ms: u64,
    pub error: Option<String>,
}

/// Text returned to the caller plus how it was produced
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub text: String,
    /// Model that produced `text`; `None` when the static itinerary was used
    pub model: Option<String>,
    pub attempts: Vec<AttemptResult>,
}

impl GenerationResult {
    pub fn used_fallback(&self) -> bool {
        self.model.is_none()
    }
}

/// Calls the configured models in order and returns the first usable answer,
/// or the static itinerary once all of them have failed.
pub struct FallbackGenerator {
    provider: Arc<dyn LlmProvider>,
    config: GenerationConfig,
}

impl std::fmt::Debug for FallbackGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackGenerator")
            .field("provider", &self.provider.provider_name())
            .field("config", &self.config)
            .finish()
    }
}

impl FallbackGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, config: GenerationConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Never fails; exhausting the model list yields the static itinerary
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        let llm_request = LlmRequest::builder()
            .user(request.prompt.clone())
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build();

        let mut attempts = Vec::with_capacity(self.config.models.len());

        for model in &self.config.models {
            let start = Instant::now();
            let outcome = self.try_model(model, llm_request.clone()).await;
            let latency_ms = start.elapsed().as_millis() as u64;

            match outcome {
                Ok(text) => {
                    counter!("generation_attempts_total", "model" => model.clone(), "status" => "success")
                        .increment(1);
                    info!(model = %model, latency_ms, "Generation succeeded");

                    attempts.push(AttemptResult {
                        model: model.clone(),
                        success: true,
                        latency_ms,
                        error: None,
                    });

                    return GenerationResult {
                        text,
                        model: Some(model.clone()),
                        attempts,
                    };
                }
                Err(e) => {
                    counter!("generation_attempts_total", "model" => model.clone(), "status" => "error")
                        .increment(1);
                    warn!(model = %model, latency_ms, error = %e, "Generation backend failed");

                    attempts.push(AttemptResult {
                        model: model.clone(),
                        success: false,
                        latency_ms,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        counter!("generation_fallback_total").increment(1);
        warn!(
            attempted = attempts.len(),
            "All generation backends failed, returning static itinerary"
        );

        GenerationResult {
            text: fallback_itinerary(request.day_count),
            model: None,
            attempts,
        }
    }

    /// Single call under the per-backend timeout; blank content counts as failure
    async fn try_model(&self, model: &str, request: LlmRequest) -> Result<String, DomainError> {
        debug!(model = %model, "Calling generation backend");

        let response: LlmResponse = match timeout(
            self.config.timeout,
            self.provider.chat(model, request),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(DomainError::provider(
                    self.provider.provider_name(),
                    format!(
                        "Request timed out after {}ms",
                        self.config.timeout.as_millis()
                    ),
                ));
            }
        };

        let text = response.content().trim();
        if text.is_empty() {
            return Err(DomainError::provider(
                self.provider.provider_name(),
                format!("Model '{}' returned empty content", model),
            ));
        }

        if response.finish_reason == Some(FinishReason::Length) {
            warn!(model = %model, max_tokens = self.config.max_tokens, "Itinerary cut off at the token limit");
        }
        if let Some(usage) = &response.usage {
            debug!(
                model = %model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Token usage"
            );
        }

        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;

    const FIRST: &str = "model-a";
    const SECOND: &str = "model-b";

    fn config(timeout_ms: u64) -> GenerationConfig {
        GenerationConfig {
            models: vec![FIRST.to_string(), SECOND.to_string()],
            timeout: Duration::from_millis(timeout_ms),
            ..Default::default()
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            prompt: "Plan a 3-day trip".to_string(),
            day_count: 3,
        }
    }

    #[test]
    fn test_default_config() {
        let config = GenerationConfig::default();
        assert_eq!(config.models, DEFAULT_MODELS.to_vec());
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 1000);
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let provider = Arc::new(
            MockLlmProvider::new()
                .with_response(FIRST, "  # Day 1\n- Hanoi  ")
                .with_response(SECOND, "unused"),
        );
        let generator = FallbackGenerator::new(provider.clone(), config(1000));

        let result = generator.generate(&request()).await;

        assert_eq!(result.text, "# Day 1\n- Hanoi");
        assert_eq!(result.model.as_deref(), Some(FIRST));
        assert_eq!(provider.calls(), vec![FIRST.to_string()]);
    }

    #[tokio::test]
    async fn test_falls_through_to_second_backend() {
        let provider = Arc::new(
            MockLlmProvider::new()
                .with_error(FIRST, "HTTP 503")
                .with_response(SECOND, "second itinerary"),
        );
        let generator = FallbackGenerator::new(provider.clone(), config(1000));

        let result = generator.generate(&request()).await;

        assert_eq!(result.text, "second itinerary");
        assert_eq!(provider.calls(), vec![FIRST.to_string(), SECOND.to_string()]);
        assert_eq!(result.attempts.len(), 2);
        assert!(!result.attempts[0].success);
        assert!(result.attempts[1].success);
    }

    #[tokio::test]
    async fn test_blank_content_is_failure() {
        let provider = Arc::new(
            MockLlmProvider::new()
                .with_response(FIRST, "   \n ")
                .with_response(SECOND, "real answer"),
        );
        let generator = FallbackGenerator::new(provider, config(1000));

        let result = generator.generate(&request()).await;

        assert_eq!(result.text, "real answer");
        assert!(result.attempts[0]
            .error
            .as_deref()
            .is_some_and(|e| e.contains("empty content")));
    }

    #[tokio::test]
    async fn test_timeout_moves_to_next_backend() {
        let provider = Arc::new(
            MockLlmProvider::new()
                .with_response(FIRST, "too late")
                .with_delay(FIRST, Duration::from_millis(500))
                .with_response(SECOND, "on time"),
        );
        let generator = FallbackGenerator::new(provider, config(50));

        let result = generator.generate(&request()).await;

        assert_eq!(result.text, "on time");
        assert!(result.attempts[0]
            .error
            .as_deref()
            .is_some_and(|e| e.contains("timed out")));
    }

    #[tokio::test]
    async fn test_all_backends_fail_returns_static_itinerary() {
        let provider = Arc::new(
            MockLlmProvider::new()
                .with_error(FIRST, "HTTP 500")
                .with_error(SECOND, "HTTP 429"),
        );
        let generator = FallbackGenerator::new(provider.clone(), config(1000));

        let result = generator.generate(&request()).await;

        assert!(result.used_fallback());
        assert_eq!(result.text, fallback_itinerary(3));
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_model_list_returns_static_itinerary() {
        let provider = Arc::new(MockLlmProvider::new());
        let generator = FallbackGenerator::new(
            provider.clone(),
            GenerationConfig {
                models: vec![],
                ..Default::default()
            },
        );

        let result = generator.generate(&request()).await;

        assert!(result.used_fallback());
        assert!(provider.calls().is_empty());
    }
}
