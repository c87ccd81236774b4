//! CLI module for the Hybrid Travel Assistant
//!
//! - `serve`: HTTP front door (`/ask`, health, metrics)
//! - `chat`: interactive console
//! - `ask`: answer one question and exit
//! - `load-graph` / `upload-vectors`: seed the graph and the vector index

pub mod chat;
pub mod ingest;
pub mod serve;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Hybrid Travel Assistant - itineraries from vector search, a knowledge graph and LLMs
#[derive(Parser)]
#[command(name = "travel-assistant")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Interactive console; type `exit` to quit
    Chat,

    /// Answer a single question and print the itinerary
    Ask {
        /// The travel question
        query: String,
    },

    /// Merge dataset cities and their connections into the knowledge graph
    LoadGraph {
        /// Dataset file; defaults to `data.dataset_file`
        #[arg(long)]
        data_file: Option<PathBuf>,
    },

    /// Embed the dataset and upsert it into the vector index
    UploadVectors {
        /// Dataset file; defaults to `data.dataset_file`
        #[arg(long)]
        data_file: Option<PathBuf>,

        /// Nodes per embedding and upsert batch; defaults to `data.batch_size`
        #[arg(long)]
        batch_size: Option<usize>,
    },
}

/// Load `.env` and the layered configuration, then install logging
pub fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&logging::LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    });

    Ok(config)
}
