use anyhow::{Context, Result};
use clap::Parser;
use sheetfix_server::cleanup::CleanupScheduler;
use sheetfix_server::config::ServerConfig;
use sheetfix_server::storage::TempStore;
use sheetfix_server::{create_router, AppState};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = TempStore::open(&config.upload_dir).with_context(|| {
        format!(
            "failed to prepare upload directory {}",
            config.upload_dir.display()
        )
    })?;
    info!(dir = %store.root().display(), "upload directory ready");

    let scheduler = CleanupScheduler::start(
        store.root().to_path_buf(),
        config.cleanup_interval(),
        config.max_file_age(),
    );

    let app = create_router(AppState::from_config(store, &config));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(addr = %listener.local_addr()?, "sheetfix-server listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    scheduler.shutdown().await;
    served.context("server error")
}
