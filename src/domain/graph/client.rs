//! Knowledge graph trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::CityRecord;
use crate::domain::dataset::CityNode;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Relationship followed one hop when collecting connected cities
pub const DEFAULT_RELATIONSHIP: &str = "CONNECTED_TO";

/// Relationship types are interpolated into Cypher, so only plain identifiers
/// are accepted.
pub fn is_valid_relationship_type(relation: &str) -> bool {
    let mut chars = relation.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Graph of cities and the relationships between them
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KnowledgeGraph: Send + Sync + Debug {
    /// One record per city whose name is in `names`, with the names of the
    /// cities it is directly connected to. An empty result is not an error.
    async fn fetch_context(&self, names: &[String]) -> Result<Vec<CityRecord>, DomainError>;

    /// Create or update city nodes, returning how many were written
    async fn merge_cities(&self, cities: &[CityNode]) -> Result<usize, DomainError>;

    /// Create a directed relationship between two named cities if absent
    async fn merge_relationship(
        &self,
        from: &str,
        to: &str,
        relation: &str,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_type_validation() {
        assert!(is_valid_relationship_type("CONNECTED_TO"));
        assert!(is_valid_relationship_type("_NEAR2"));
        assert!(!is_valid_relationship_type(""));
        assert!(!is_valid_relationship_type("2HOPS"));
        assert!(!is_valid_relationship_type("X]->(n) DETACH DELETE n //"));
        assert!(!is_valid_relationship_type("CONNECTED TO"));
    }
}
