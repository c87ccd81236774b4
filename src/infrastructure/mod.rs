//! Infrastructure layer - External service implementations

pub mod cache;
pub mod embedding;
pub mod graph;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod vector;
