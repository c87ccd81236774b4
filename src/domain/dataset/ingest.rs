//! Seed the knowledge graph and the vector index from the dataset

use std::time::Duration;

use tracing::{debug, info, warn};

use super::{id_name_map, CityNode};
use crate::domain::embedding::Embedder;
use crate::domain::graph::{is_valid_relationship_type, KnowledgeGraph};
use crate::domain::vector::{VectorIndex, VectorRecord};
use crate::domain::DomainError;

/// What a graph load wrote and skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphLoadReport {
    pub cities: usize,
    pub relationships: usize,
    /// Connections whose target id is unknown
    pub unresolved: usize,
    /// Connections whose relation is not a plain identifier
    pub invalid_relations: usize,
}

/// Merge every named node, then one relationship per resolvable connection
pub async fn load_graph(
    graph: &dyn KnowledgeGraph,
    nodes: &[CityNode],
) -> Result<GraphLoadReport, DomainError> {
    let named: Vec<CityNode> = nodes
        .iter()
        .filter(|n| !n.name.trim().is_empty())
        .cloned()
        .collect();
    if named.len() < nodes.len() {
        warn!(skipped = nodes.len() - named.len(), "Skipping nodes without a name");
    }

    let mut report = GraphLoadReport {
        cities: graph.merge_cities(&named).await?,
        ..Default::default()
    };
    info!(cities = report.cities, "Merged city nodes");

    let names = id_name_map(&named);

    for node in &named {
        for connection in &node.connections {
            let Some(target) = names.get(connection.target.as_str()) else {
                debug!(from = %node.id, target = %connection.target, "Unknown connection target");
                report.unresolved += 1;
                continue;
            };

            let relation = connection.relationship_type();
            if !is_valid_relationship_type(&relation) {
                warn!(from = %node.name, relation = %connection.relation, "Skipping invalid relation");
                report.invalid_relations += 1;
                continue;
            }

            graph.merge_relationship(&node.name, target, &relation).await?;
            report.relationships += 1;
        }
    }

    info!(
        relationships = report.relationships,
        unresolved = report.unresolved,
        invalid = report.invalid_relations,
        "Merged relationships"
    );

    Ok(report)
}

/// Embed and upsert the dataset in batches, pausing between batches.
///
/// Nodes with no text to embed are skipped. Returns the number of vectors
/// the index reports as written.
pub async fn upload_vectors(
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    nodes: &[CityNode],
    batch_size: usize,
    pause: Duration,
) -> Result<usize, DomainError> {
    if batch_size == 0 {
        return Err(DomainError::validation("Batch size must be at least 1"));
    }

    let items: Vec<(&str, &str)> = nodes
        .iter()
        .map(|n| (n.id.as_str(), n.embedding_text()))
        .filter(|(_, text)| !text.trim().is_empty())
        .collect();
    if items.len() < nodes.len() {
        warn!(skipped = nodes.len() - items.len(), "Skipping nodes with no text");
    }

    let batches = items.len().div_ceil(batch_size);
    let mut written = 0;

    for (i, batch) in items.chunks(batch_size).enumerate() {
        if i > 0 && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }

        let texts = batch.iter().map(|(_, text)| text.to_string()).collect();
        let vectors = embedder.embed_batch(texts).await?;
        if vectors.len() != batch.len() {
            return Err(DomainError::embedding(format!(
                "Expected {} embeddings, got {}",
                batch.len(),
                vectors.len()
            )));
        }

        let records = batch
            .iter()
            .zip(vectors)
            .map(|((id, text), values)| VectorRecord::with_text(*id, values, *text))
            .collect();

        written += index.upsert(records).await?;
        info!(batch = i + 1, batches, written, "Uploaded batch");
    }

    Ok(written)
}
