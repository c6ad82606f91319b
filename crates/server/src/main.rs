//! cityfind server entry point.
//!
//! Loads configuration, opens the dataset read-only and serves the HTTP API
//! until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};
use cityfind_core::{AppConfig, Dataset, SearchService};
use cityfind_server::{AppState, router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv()
        && !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
    {
        eprintln!("Warning: failed to load .env file: {e}");
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = AppConfig::load().context("invalid configuration")?;

    let dataset = Dataset::open(&config.db_path)
        .await
        .map_err(|e| anyhow::anyhow!("failed to open dataset: {e}"))?
        .with_timeout(config.query_timeout());

    let search = SearchService::from_config(Arc::new(dataset), &config);
    let app = router(AppState::new(search));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, cache_size = config.cache_size, "starting cityfind server");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
