use anyhow::{Context, Result};
use gh_user_search::config::Config;
use gh_user_search::github::rest::GitHubRest;
use gh_user_search::search::SearchEngine;
use gh_user_search::tui::{self, state::AppState, TuiCommand};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load_or_default(Path::new("config.toml"))?;

    // The TUI owns stdout, so logs go to a file.
    let log_file = std::fs::File::create(&config.logging.file)
        .with_context(|| format!("Failed to create log file: {}", config.logging.file))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    tracing::info!(
        api_base = %config.github.api_base,
        debounce_ms = config.search.debounce_ms,
        "starting"
    );

    let client = Arc::new(GitHubRest::new(&config.github)?);

    let (state_tx, state_rx) = watch::channel(AppState::new());
    let (cmd_tx, cmd_rx) = mpsc::channel::<TuiCommand>(64);

    let engine = SearchEngine::new(client, config.search.debounce(), state_tx);
    let engine_handle = tokio::spawn(engine.run(cmd_rx));

    // Blocks until quit
    tui::run_tui(state_rx, cmd_tx).await?;

    let _ = engine_handle.await;
    tracing::debug!("shutting down");
    Ok(())
}
