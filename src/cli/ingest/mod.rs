//! Dataset loading commands

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::dataset::{self, load_dataset, CityNode};

/// `load-graph`: merge cities and connections into Neo4j
pub async fn load_graph(data_file: Option<PathBuf>) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let nodes = read_nodes(&config, data_file.as_deref()).await?;

    let graph = crate::connect_graph(&config).await?;
    let report = dataset::load_graph(&graph, &nodes).await?;

    println!(
        "Loaded {} cities and {} relationships ({} unresolved, {} invalid)",
        report.cities, report.relationships, report.unresolved, report.invalid_relations
    );
    Ok(())
}

/// `upload-vectors`: embed the dataset and upsert it into Pinecone
pub async fn upload_vectors(
    data_file: Option<PathBuf>,
    batch_size: Option<usize>,
) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let nodes = read_nodes(&config, data_file.as_deref()).await?;

    let embedder = crate::build_embedder(&config).await?;
    let index = crate::build_vector_index(&config)?;
    let batch_size = batch_size.unwrap_or(config.data.batch_size);

    let written = dataset::upload_vectors(
        &embedder,
        &index,
        &nodes,
        batch_size,
        Duration::from_millis(config.data.batch_pause_ms),
    )
    .await?;

    println!("Uploaded {} vectors to index '{}'", written, config.vector.index_name);
    Ok(())
}

async fn read_nodes(config: &AppConfig, data_file: Option<&Path>) -> anyhow::Result<Vec<CityNode>> {
    let path = data_file.unwrap_or(config.data.dataset_file.as_path());
    let nodes = load_dataset(path)
        .await
        .with_context(|| format!("Failed to load dataset {}", path.display()))?;

    info!(path = %path.display(), nodes = nodes.len(), "Dataset loaded");
    Ok(nodes)
}
