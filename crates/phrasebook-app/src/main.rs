use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use phrasebook_cache::{AssetCache, HttpFetcher};
use phrasebook_config::Config;
use phrasebook_speech::{EspeakEngine, SpeechEngine};
use tracing_subscriber::EnvFilter;

use crate::controller::AppController;
use crate::state::AppState;

pub mod controller;
pub mod dataset;
pub mod events;
pub mod install;
pub mod io;
pub mod profile;
pub mod state;
pub mod ui;


#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Browse, search and listen to Bengali-Italian phrases
#[derive(Debug, Parser)]
#[command(name = "phrasebook", version)]
struct Cli {
    /// JSON config file (defaults to ./phrasebook.json when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Phrase list JSON file instead of the built-in one
    #[arg(long)]
    data: Option<PathBuf>,

    /// Phrase cards per page
    #[arg(long)]
    page_size: Option<usize>,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(path) = &self.data {
            config.data.path = Some(path.clone());
        }
        if let Some(page_size) = self.page_size {
            anyhow::ensure!(page_size > 0, "--page-size must be at least 1");
            config.ui.page_size = page_size;
        }
        if self.no_color {
            config.ui.color = false;
        }
        Ok(())
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let mut config = profile::load_config(cli.config.as_deref())?;
    cli.apply(&mut config)?;
    profile::validate(&config)?;
    tracing::debug!("Config: {:?}", config);

    let cache = if config.cache.enabled {
        let cache = AssetCache::from_config(&config.cache, Arc::new(HttpFetcher::new()))
            .context("Failed to set up the asset cache")?;
        match cache.activate().await {
            Ok(removed) if !removed.is_empty() => {
                tracing::info!("Removed {} old caches", removed.len());
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to clean old caches: {}", e),
        }
        Some(Arc::new(cache))
    } else {
        None
    };

    let store = dataset::load_store(&config.data, cache.as_deref()).await?;
    tracing::info!("Loaded {} phrases", store.len());

    let engine: Arc<dyn SpeechEngine> = Arc::new(EspeakEngine::from_config(&config.speech));
    let state = Arc::new(AppState::new(config, store, cache));

    let controller = AppController::new(state);
    let mut tasks = controller
        .spawn_tasks(engine, io::spawn_stdin_reader())
        .await;

    let mut failure = None;
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => tracing::info!("Shutdown requested"),
                Err(e) => tracing::error!("Failed to listen for ctrl+c: {}", e),
            }
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::debug!("Task finished"),
                Ok(Err(e)) => {
                    tracing::error!("Task failed: {:#}", e);
                    failure = Some(e);
                }
                Err(e) => {
                    tracing::error!("Task panicked: {}", e);
                    failure = Some(anyhow::anyhow!("Task panicked: {e}"));
                }
            }
        }
    }

    controller.shutdown();

    let drained = tokio::time::timeout(Duration::from_secs(2), async {
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("Task exited with error during shutdown: {:#}", e),
                Err(e) => tracing::error!("Task panicked: {}", e),
            }
        }
    })
    .await;

    if drained.is_err() {
        tracing::warn!("Tasks did not stop in time");
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
