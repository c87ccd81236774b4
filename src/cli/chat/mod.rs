//! Console commands - interactive chat and one-shot ask

use std::path::Path;

use anyhow::bail;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::{CacheStore, HybridPipeline, VectorIndex};
use crate::infrastructure::cache::CacheType;

const GREETING: &str = "Hybrid travel assistant. Type 'exit' to quit.";
const PROMPT: &str = "\nEnter your travel question: ";

/// Interactive console: clears the response cache, then answers questions
/// line by line until `exit` or end of input
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let pipeline = start(&config).await?;

    let cache_config = config.cache_config()?;
    let cache_file = (cache_config.cache_type == CacheType::File)
        .then_some(cache_config.path.as_path());
    println!("{}", reset_cache(pipeline.cache().as_ref(), cache_file).await);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    run_console(&pipeline, stdin, &mut stdout).await
}

/// Answer one question and print the itinerary
pub async fn ask(query: &str) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let pipeline = start(&config).await?;

    let response = pipeline.answer(query).await?;
    println!("{}", response);

    Ok(())
}

async fn start(config: &AppConfig) -> anyhow::Result<HybridPipeline> {
    let pipeline = crate::build_pipeline(config).await?;
    ensure_index_dimension(pipeline.vector_index().as_ref(), config.embedding.dimension).await?;
    Ok(pipeline)
}

/// Empty the cache and describe what happened. `cache_file` is set for the
/// file backend so a missing file can be reported as a fresh start.
async fn reset_cache(cache: &dyn CacheStore, cache_file: Option<&Path>) -> String {
    let existed = cache_file.is_none_or(|path| path.exists());

    match cache.clear().await {
        Ok(()) if existed => "Cache cleared successfully.".to_string(),
        Ok(()) => "No cache file found, starting fresh.".to_string(),
        Err(e) => {
            warn!(error = %e, "Failed to clear cache");
            format!("Failed to clear cache: {}", e)
        }
    }
}

/// Fail fast when the index was built for a different embedding size
pub async fn ensure_index_dimension(
    index: &dyn VectorIndex,
    expected: usize,
) -> anyhow::Result<()> {
    let stats = index.stats().await?;

    if stats.dimension != expected {
        bail!(
            "Vector index dimension {} does not match embedding dimension {}",
            stats.dimension,
            expected
        );
    }

    info!(
        dimension = stats.dimension,
        vectors = stats.total_vector_count,
        "Vector index ready"
    );
    Ok(())
}

/// Read-answer loop. Per-question errors are printed and the loop goes on.
pub async fn run_console<R, W>(
    pipeline: &HybridPipeline,
    reader: R,
    writer: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    writer.write_all(GREETING.as_bytes()).await?;
    writer.write_all(b"\n").await?;

    loop {
        writer.write_all(PROMPT.as_bytes()).await?;
        writer.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();

        if is_exit(query) {
            break;
        }

        match pipeline.answer(query).await {
            Ok(response) => {
                writer
                    .write_all(format!("\n Itinerary:\n{}\n", response).as_bytes())
                    .await?;
            }
            Err(e) => {
                writer.write_all(format!("Error: {}\n", e).as_bytes()).await?;
            }
        }
    }

    writer.flush().await?;
    Ok(())
}

fn is_exit(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit")
}
