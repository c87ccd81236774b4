//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheSettings, DataSettings, EmbeddingSettings, GenerationSettings, GraphSettings,
    LogFormat, LoggingConfig, ServerConfig, VectorSettings,
};
