use clap::Parser;
use hybrid_travel_assistant::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Chat => cli::chat::run().await,
        Command::Ask { query } => cli::chat::ask(&query).await,
        Command::LoadGraph { data_file } => cli::ingest::load_graph(data_file).await,
        Command::UploadVectors {
            data_file,
            batch_size,
        } => cli::ingest::upload_vectors(data_file, batch_size).await,
    }
}
