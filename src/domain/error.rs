use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Embedding error: {message}")]
    Embedding { message: String },

    #[error("Vector search error: {message}")]
    VectorSearch { message: String },

    #[error("Graph error: {message}")]
    Graph { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Dataset error: {message}")]
    Dataset { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    pub fn vector_search(message: impl Into<String>) -> Self {
        Self::VectorSearch {
            message: message.into(),
        }
    }

    pub fn graph(message: impl Into<String>) -> Self {
        Self::Graph {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn dataset(message: impl Into<String>) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True for failures of a remote retrieval source (vector index or graph)
    pub fn is_retrieval(&self) -> bool {
        matches!(self, Self::VectorSearch { .. } | Self::Graph { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error() {
        let error = DomainError::provider("huggingface", "HTTP 503");
        assert_eq!(error.to_string(), "Provider error: huggingface - HTTP 503");
    }

    #[test]
    fn test_cache_error() {
        let error = DomainError::cache("disk full");
        assert_eq!(error.to_string(), "Cache error: disk full");
    }

    #[test]
    fn test_retrieval_classification() {
        assert!(DomainError::vector_search("timeout").is_retrieval());
        assert!(DomainError::graph("connection refused").is_retrieval());
        assert!(!DomainError::embedding("model missing").is_retrieval());
    }
}
