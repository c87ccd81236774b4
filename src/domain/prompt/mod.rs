//! Prompt composition - templates and the itinerary prompt builder

mod itinerary;
mod template;

pub use itinerary::{
    extract_day_count, render_graph_context, render_semantic_summary, GenerationRequest,
    PromptBuilder, DEFAULT_DAY_COUNT, ITINERARY_TEMPLATE,
};
pub use template::{PromptTemplate, PromptVariable, TemplateError};
