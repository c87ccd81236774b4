//! Travel dataset used to seed the graph and the vector index

mod ingest;
mod node;

pub use ingest::{load_graph, upload_vectors, GraphLoadReport};
pub use node::{id_name_map, load_dataset, parse_dataset, CityNode, Connection};
