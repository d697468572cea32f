//! Playground Proxy Server
//!
//! HTTP backend for a chat-completion playground UI: streams completions
//! from an OpenAI-compatible API to the browser and appends a token/cost
//! summary line to every relayed stream.

use anyhow::{Context, Result};
use tracing::info;

mod config;
mod handlers;
mod middleware;
mod models;
mod services;
mod utils;

use config::Settings;
use handlers::create_router;
use utils::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    // Load settings from environment
    let settings = Settings::new().context("Failed to load server settings")?;
    info!("Server settings loaded");

    // Create router
    let app = create_router(settings.clone()).await?;

    // Build server address
    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Playground proxy server started");
    info!("Health check: http://{}/health", addr);
    info!("Completion relay: http://{}/completion", addr);
    info!("Model listing: http://{}/models", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    Ok(())
}
