//! Dataset node types and loading

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Outgoing edge declared on a dataset node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Id of the target node
    pub target: String,
    /// Relationship name, e.g. `connected_to`
    pub relation: String,
}

impl Connection {
    /// Relationship type as written to the graph
    pub fn relationship_type(&self) -> String {
        self.relation.to_uppercase()
    }
}

/// A place in the travel dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub best_time_to_visit: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub semantic_text: Option<String>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl CityNode {
    /// Text indexed for semantic search: the curated semantic text, else the
    /// description, else nothing
    pub fn embedding_text(&self) -> &str {
        self.semantic_text
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.description.as_deref().filter(|d| !d.is_empty()))
            .unwrap_or("")
    }
}

/// Parse a dataset from its JSON text
pub fn parse_dataset(json: &str) -> Result<Vec<CityNode>, DomainError> {
    serde_json::from_str(json)
        .map_err(|e| DomainError::dataset(format!("Invalid dataset JSON: {}", e)))
}

/// Read and parse the dataset file
pub async fn load_dataset(path: &Path) -> Result<Vec<CityNode>, DomainError> {
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        DomainError::dataset(format!("Failed to read {}: {}", path.display(), e))
    })?;

    parse_dataset(&json)
}

/// Map of node id to node name, for resolving connection targets
pub fn id_name_map(nodes: &[CityNode]) -> HashMap<&str, &str> {
    nodes
        .iter()
        .map(|n| (n.id.as_str(), n.name.as_str()))
        .collect()
}
