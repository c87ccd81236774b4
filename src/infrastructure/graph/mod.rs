//! Knowledge graph implementations

mod neo4j;

pub use neo4j::{Neo4jConfig, Neo4jKnowledgeGraph};
