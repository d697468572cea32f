//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod completion;
pub mod health;
pub mod models;

use crate::config::Settings;
use crate::middleware::request_logging_middleware;
use crate::services::UpstreamClient;
use anyhow::Result;
use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub client: UpstreamClient,
}

/// Create application router
pub async fn create_router(settings: Settings) -> Result<Router> {
    // Create upstream client
    let client = UpstreamClient::new(settings.clone())?;

    // Create application state
    let app_state = Arc::new(AppState {
        settings: settings.clone(),
        client,
    });

    // Create middleware stack
    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_logging_middleware));

    // Create routes
    let router = Router::new()
        .route("/completion", post(completion::handle_completion))
        .route("/models", post(models::handle_models))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .with_state(app_state)
        .layer(middleware_stack);

    // The playground runs in a browser, so CORS stays permissive by default
    let router = if settings.security.cors_enabled {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    Ok(router)
}
