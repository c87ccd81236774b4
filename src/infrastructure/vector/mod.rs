//! Vector index implementations

mod pinecone;

pub use pinecone::{PineconeIndex, PINECONE_API_VERSION};
