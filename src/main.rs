//! Vigil command-line runner.
//!
//! Usage: `vigil <sources.json> [tier] [keyword]`
//!
//! Reads a JSON array of source descriptors, assesses them in batches and prints the
//! verdicts as pretty JSON on stdout. Logs go to stderr, filtered by `RUST_LOG`.

use std::path::PathBuf;

use anyhow::{Context, bail};

use vigil::{BatchOptions, CheckTier, Engine, EngineConfig, SourceDescriptor};

const USAGE: &str = "usage: vigil <sources.json> [basic|functional|content|deep] [keyword]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        bail!(USAGE);
    };
    let tier = match args.next() {
        Some(raw) => raw.parse::<CheckTier>().map_err(anyhow::Error::msg)?,
        None => CheckTier::default(),
    };
    let keyword = args.next();

    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let sources: Vec<SourceDescriptor> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of sources", path.display()))?;

    let config = EngineConfig::from_env()?;
    tracing::info!(
        sources = sources.len(),
        tier = %tier,
        concurrency = config.concurrency,
        timeout_ms = config.timeout.as_millis() as u64,
        "Vigil starting"
    );

    let engine = Engine::new(config)?;
    let mut options = BatchOptions::default().tier(tier);
    if let Some(keyword) = keyword {
        options = options.keyword(keyword);
    }

    let results = engine.assess_batch(&sources, options).await;
    let available = results.iter().filter(|r| r.available).count();
    tracing::info!(available, total = results.len(), "Assessment finished");

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
