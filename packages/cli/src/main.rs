//! Command-line entry point: check one claim and print the verdict JSON.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use claimlens::providers::{
    HfEmbeddingModel, HfParaphraser, HfStanceClassifier, HttpArticleFetcher, TavilySearchProvider,
};
use claimlens::{CachedFetcher, Engine, EngineConfig, FetchCache};

#[derive(Debug, Parser)]
#[command(name = "claimlens", about = "Verify a short factual claim against retrieved evidence")]
struct Args {
    /// The claim to verify
    claim: Vec<String>,

    /// Cap on deduplicated documents collected across all queries
    #[arg(long)]
    max_documents: Option<usize>,

    /// Number of top passages scored against the claim
    #[arg(long)]
    top_k: Option<usize>,
}

/// Environment-derived configuration.
///
/// Missing required keys fail here, at startup, before any retrieval.
struct Config {
    tavily_api_key: String,
    hf_api_key: String,
    paraphrase_model: Option<String>,
    cache_dir: PathBuf,
}

impl Config {
    fn from_env() -> Result<Self> {
        let tavily_api_key =
            std::env::var("TAVILY_API_KEY").context("TAVILY_API_KEY must be set")?;
        let hf_api_key = std::env::var("HF_API_KEY").context("HF_API_KEY must be set")?;
        let paraphrase_model = std::env::var("PARAPHRASE_MODEL").ok().filter(|m| !m.is_empty());
        let cache_dir = std::env::var("CLAIMLENS_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("cache"));

        Ok(Self {
            tavily_api_key,
            hf_api_key,
            paraphrase_model,
            cache_dir,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,claimlens=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let claim = args.claim.join(" ");
    if claim.trim().is_empty() {
        anyhow::bail!("usage: claimlens \"<claim text>\"");
    }

    let config = Config::from_env().context("Failed to load configuration")?;

    let cache = FetchCache::new(&config.cache_dir).context("Failed to open fetch cache")?;
    let fetcher = CachedFetcher::new(HttpArticleFetcher::new(), cache);

    let mut engine_config = EngineConfig::default();
    if let Some(max) = args.max_documents {
        engine_config = engine_config.with_max_documents(max);
    }
    if let Some(top_k) = args.top_k {
        engine_config = engine_config.with_top_k(top_k);
    }

    let mut engine = Engine::new(
        Arc::new(TavilySearchProvider::new(config.tavily_api_key)),
        Arc::new(fetcher),
        Arc::new(HfEmbeddingModel::new(config.hf_api_key.clone())),
        Arc::new(HfStanceClassifier::new(config.hf_api_key.clone())),
    )
    .with_config(engine_config);

    if let Some(model) = config.paraphrase_model {
        engine = engine.with_paraphraser(Arc::new(HfParaphraser::new(config.hf_api_key, model)));
    }

    tracing::info!(claim = %claim, "starting claim check");
    let verdict = engine.check(&claim).await;

    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}
