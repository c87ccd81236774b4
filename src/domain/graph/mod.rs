//! Knowledge graph domain - city records and relationship lookups

mod client;
mod record;

pub use client::{is_valid_relationship_type, KnowledgeGraph, DEFAULT_RELATIONSHIP};
pub use record::{CityRecord, RawCityRow};

#[cfg(test)]
pub use client::MockKnowledgeGraph;
