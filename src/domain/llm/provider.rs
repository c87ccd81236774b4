use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for chat-completion providers (Hugging Face router, OpenAI-compatible hosts)
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request for the given model
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
