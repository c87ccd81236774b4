//! Chat-completion provider implementations

mod http_client;
mod huggingface;

pub use http_client::{HttpClient, HttpClientTrait};
pub use huggingface::{HuggingFaceProvider, DEFAULT_HF_ROUTER_URL};

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
