//! Neo4j-backed knowledge graph over Bolt

use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph};
use tracing::{debug, info};

use crate::domain::dataset::CityNode;
use crate::domain::graph::{is_valid_relationship_type, CityRecord, KnowledgeGraph, RawCityRow};
use crate::domain::DomainError;

/// Connection settings for [`Neo4jKnowledgeGraph`]
#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    /// e.g. `bolt://localhost:7687` or `neo4j+s://xxxx.databases.neo4j.io`
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
    /// Relationship followed when collecting connected cities
    pub relationship: String,
}

pub struct Neo4jKnowledgeGraph {
    graph: Graph,
    uri: String,
    fetch_query: String,
}

impl std::fmt::Debug for Neo4jKnowledgeGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Neo4jKnowledgeGraph")
            .field("uri", &self.uri)
            .finish()
    }
}

impl Neo4jKnowledgeGraph {
    /// Connect and verify the connection with a trivial query
    pub async fn connect(config: &Neo4jConfig) -> Result<Self, DomainError> {
        if !is_valid_relationship_type(&config.relationship) {
            return Err(DomainError::configuration(format!(
                "Invalid relationship type: {}",
                config.relationship
            )));
        }

        info!(uri = %config.uri, "Connecting to Neo4j");

        let neo4j_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .fetch_size(500)
            .max_connections(config.max_connections)
            .build()
            .map_err(|e| DomainError::graph(format!("Failed to build Neo4j config: {}", e)))?;

        let graph = Graph::connect(neo4j_config)
            .await
            .map_err(|e| DomainError::graph(format!("Failed to connect to Neo4j: {}", e)))?;

        let mut result = graph
            .execute(query("RETURN 1 AS ok"))
            .await
            .map_err(|e| DomainError::graph(format!("Connection test failed: {}", e)))?;
        result
            .next()
            .await
            .map_err(|e| DomainError::graph(format!("Connection test failed: {}", e)))?;

        info!(uri = %config.uri, "Neo4j connection established");

        Ok(Self {
            graph,
            uri: config.uri.clone(),
            fetch_query: fetch_context_query(&config.relationship),
        })
    }
}

fn fetch_context_query(relationship: &str) -> String {
    format!(
        "MATCH (c:City) WHERE c.name IN $city_names \
         OPTIONAL MATCH (c)-[:{}]->(related:City) \
         RETURN c.name AS name, c.description AS description, c.region AS region, \
         c.best_time_to_visit AS best_time, c.tags AS tags, \
         collect(related.name) AS connected_cities",
        relationship
    )
}

const MERGE_CITIES_QUERY: &str = "\
UNWIND range(0, size($names) - 1) AS i \
MERGE (c:City {name: $names[i]}) \
SET c.description = $descriptions[i], \
    c.region = $regions[i], \
    c.best_time_to_visit = $best_times[i], \
    c.tags = $tags[i], \
    c.semantic_text = $semantic_texts[i]";

fn merge_relationship_query(relation: &str) -> String {
    format!(
        "MATCH (a:City {{name: $from}}) \
         MATCH (b:City {{name: $to}}) \
         MERGE (a)-[:{}]->(b)",
        relation
    )
}

#[async_trait]
impl KnowledgeGraph for Neo4jKnowledgeGraph {
    async fn fetch_context(&self, names: &[String]) -> Result<Vec<CityRecord>, DomainError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut result = self
            .graph
            .execute(query(&self.fetch_query).param("city_names", names.to_vec()))
            .await
            .map_err(|e| DomainError::graph(format!("Graph query failed: {}", e)))?;

        let mut records = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| DomainError::graph(format!("Failed to read graph row: {}", e)))?
        {
            let raw: RawCityRow = row
                .to()
                .map_err(|e| DomainError::graph(format!("Unexpected graph row: {}", e)))?;

            if let Some(record) = raw.normalize() {
                records.push(record);
            }
        }

        debug!(requested = names.len(), found = records.len(), "Fetched city context");
        Ok(records)
    }

    async fn merge_cities(&self, cities: &[CityNode]) -> Result<usize, DomainError> {
        if cities.is_empty() {
            return Ok(0);
        }

        let text = |v: &Option<String>| v.clone().unwrap_or_default();

        let q = query(MERGE_CITIES_QUERY)
            .param("names", cities.iter().map(|c| c.name.clone()).collect::<Vec<_>>())
            .param(
                "descriptions",
                cities.iter().map(|c| text(&c.description)).collect::<Vec<_>>(),
            )
            .param("regions", cities.iter().map(|c| text(&c.region)).collect::<Vec<_>>())
            .param(
                "best_times",
                cities
                    .iter()
                    .map(|c| text(&c.best_time_to_visit))
                    .collect::<Vec<_>>(),
            )
            .param("tags", cities.iter().map(|c| c.tags.clone()).collect::<Vec<_>>())
            .param(
                "semantic_texts",
                cities.iter().map(|c| text(&c.semantic_text)).collect::<Vec<_>>(),
            );

        self.graph
            .run(q)
            .await
            .map_err(|e| DomainError::graph(format!("Failed to merge cities: {}", e)))?;

        Ok(cities.len())
    }

    async fn merge_relationship(
        &self,
        from: &str,
        to: &str,
        relation: &str,
    ) -> Result<(), DomainError> {
        if !is_valid_relationship_type(relation) {
            return Err(DomainError::validation(format!(
                "Invalid relationship type: {}",
                relation
            )));
        }

        self.graph
            .run(
                query(&merge_relationship_query(relation))
                    .param("from", from)
                    .param("to", to),
            )
            .await
            .map_err(|e| {
                DomainError::graph(format!(
                    "Failed to merge {} relationship {} -> {}: {}",
                    relation, from, to, e
                ))
            })
    }
}
