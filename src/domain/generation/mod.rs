//! Itinerary generation over an ordered list of backend models

mod fallback;
mod generator;

pub use fallback::{fallback_itinerary, FALLBACK_MAX_CHARS};
pub use generator::{
    AttemptResult, FallbackGenerator, GenerationConfig, GenerationResult, DEFAULT_MODELS,
};
