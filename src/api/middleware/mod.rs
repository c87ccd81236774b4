//! API middleware components

pub mod logging;
pub mod request_metrics;

pub use logging::logging_middleware;
pub use request_metrics::metrics_middleware;

use axum::{body::Body, extract::MatchedPath, http::Request};

/// Route template when the router matched one, else the raw path
fn request_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}
