//! Place-name extraction from retrieved text

mod extractor;

pub use extractor::{EntityExtractor, DEFAULT_ANCHORS, KNOWN_PLACES};
