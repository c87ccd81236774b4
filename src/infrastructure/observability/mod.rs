//! Observability infrastructure - Prometheus metrics

mod config;
mod prometheus;

pub use config::MetricsConfig;
pub use prometheus::{create_metrics_router, init_metrics, record_http_request, PrometheusMetrics};
