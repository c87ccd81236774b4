//! Pinecone data-plane client

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::vector::{IndexStats, VectorIndex, VectorMatch, VectorRecord};
use crate::domain::DomainError;
use crate::infrastructure::llm::HttpClientTrait;

/// Data-plane API version sent with every request
pub const PINECONE_API_VERSION: &str = "2024-07";

/// Serverless or pod index addressed by its data-plane host
#[derive(Debug)]
pub struct PineconeIndex<C: HttpClientTrait> {
    client: C,
    api_key: String,
    host: String,
}

impl<C: HttpClientTrait> PineconeIndex<C> {
    /// `host` is the index host shown in the console, with or without scheme
    pub fn new(client: C, api_key: impl Into<String>, host: impl Into<String>) -> Self {
        let host = host.into();
        let host = host.trim_end_matches('/');
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };

        Self {
            client,
            api_key: api_key.into(),
            host,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.host, path)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Api-Key", self.api_key.as_str()),
            ("X-Pinecone-API-Version", PINECONE_API_VERSION),
            ("Content-Type", "application/json"),
        ]
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorIndex for PineconeIndex<C> {
    async fn search(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, DomainError> {
        let body = serde_json::json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
        });

        let response = self
            .client
            .post_json(&self.url("query"), self.headers(), &body)
            .await
            .map_err(|e| DomainError::vector_search(e.to_string()))?;

        let response: QueryResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::vector_search(format!("Failed to parse query response: {}", e))
        })?;

        let mut matches: Vec<VectorMatch> = response
            .matches
            .into_iter()
            .map(|m| {
                let text = m
                    .metadata
                    .as_ref()
                    .and_then(|meta| meta.get("text"))
                    .and_then(|t| t.as_str())
                    .unwrap_or_default()
                    .to_string();
                VectorMatch::new(m.id, text, m.score)
            })
            .collect();

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(top_k);

        debug!(count = matches.len(), "Pinecone query complete");
        Ok(matches)
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, DomainError> {
        if records.is_empty() {
            return Ok(0);
        }

        let body = serde_json::json!({ "vectors": records });

        let response = self
            .client
            .post_json(&self.url("vectors/upsert"), self.headers(), &body)
            .await
            .map_err(|e| DomainError::vector_search(e.to_string()))?;

        let response: UpsertResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::vector_search(format!("Failed to parse upsert response: {}", e))
        })?;

        Ok(response.upserted_count.unwrap_or(records.len() as u64) as usize)
    }

    async fn stats(&self) -> Result<IndexStats, DomainError> {
        let response = self
            .client
            .post_json(
                &self.url("describe_index_stats"),
                self.headers(),
                &serde_json::json!({}),
            )
            .await
            .map_err(|e| DomainError::vector_search(e.to_string()))?;

        let response: StatsResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::vector_search(format!("Failed to parse index stats: {}", e))
        })?;

        Ok(IndexStats {
            dimension: response.dimension,
            total_vector_count: response.total_vector_count.unwrap_or(0),
        })
    }
}

// Pinecone wire types

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    upserted_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    dimension: usize,
    total_vector_count: Option<u64>,
}
