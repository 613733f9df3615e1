mod api;
mod app_state;
mod config;
mod core;
mod domain;
mod errors;
mod routes;
mod telemetry;

use anyhow::{Context, Result};
use tracing::info;

use crate::app_state::build_app_state;
use crate::config::Settings;
use crate::routes::app_router;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;

    // Guard must stay alive for the lifetime of the process so the
    // non-blocking file writer keeps flushing.
    let _guard = telemetry::init_tracing(&settings);

    info!(
        "Starting chartd v{} on {}",
        env!("CARGO_PKG_VERSION"),
        settings.listen_addr
    );
    info!("Chart manifest path: {}", settings.manifest_path.display());

    let state = build_app_state(settings.clone());
    let app = app_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(&settings.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.listen_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        return;
    }
    info!("Shutdown signal received");
}
