pub mod core;

use std::io::Write;

use tracing_subscriber::EnvFilter;

use crate::core::config::{ConfigError, ReaderConfig};
use crate::core::feed::fetcher::HttpFeedFetcher;
use crate::core::feed::loader::{FeedLoader, LoadOutcome};
use crate::core::feed::registry::{FeedRegistry, RegistryError};
use crate::core::importer::{read_sources_file, ImportError};
use crate::core::reader::FeedReader;

const DEFAULT_LOG_FILTER: &str = "feedreader=info,feedreader_lib=info";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot import feed sources: {0}")]
    Import(#[from] ImportError),
    #[error("invalid feed registry: {0}")]
    Registry(#[from] RegistryError),
    #[error("cannot build http client: {0}")]
    Client(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn load_registry(config: &ReaderConfig) -> Result<FeedRegistry, AppError> {
    let Some(path) = &config.registry_path else {
        return Ok(FeedRegistry::builtin());
    };
    let sources = read_sources_file(path)?;
    let registry = FeedRegistry::from_sources(sources)?;
    tracing::info!(path = %path.display(), feeds = registry.len(), "feed registry loaded");
    Ok(registry)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // Logs go to stderr so stdout only carries the rendered feed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn render_initial_feed(config: ReaderConfig) -> Result<(), AppError> {
    let registry = load_registry(&config)?;
    let fetcher = HttpFeedFetcher::new(config.request_timeout, &config.user_agent)?;
    let loader = FeedLoader::new(registry, fetcher).with_snippet_chars(config.snippet_chars);
    let mut reader = FeedReader::new(loader);

    let outcome = reader.load_feed(config.initial_feed).await;
    if let LoadOutcome::Failed(error) = &outcome {
        tracing::error!(%error, "initial feed could not be shown");
    }

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", reader.document().html())?;
    Ok(())
}

/// Loads `.env.local`, reads the configuration, renders the initial feed
/// and prints the page to stdout.
pub fn run() -> Result<(), AppError> {
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let config = ReaderConfig::from_env()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(render_initial_feed(config))
}
