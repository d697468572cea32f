//! Model listing handler
//!
//! Proxies the upstream /models endpoint and flattens the result to a plain
//! array of model identifier strings.

use crate::handlers::AppState;
use crate::models::playground::ModelsRequest;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{debug, error};

/// Handle model listing requests
///
/// POST /models
///
/// Any upstream failure collapses to a 500 with an `{"error"}` body; the
/// playground only distinguishes "got a list" from "didn't".
pub async fn handle_models(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ModelsRequest>,
) -> Response {
    let target = state
        .client
        .resolve_target(request.base_url.as_deref(), request.api_key.as_deref());

    debug!("Listing models from {}", target.base_url);

    match state.client.list_models(&target).await {
        Ok(ids) => Json(ids).into_response(),
        Err(e) => {
            error!("Failed to fetch models: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to fetch models"})),
            )
                .into_response()
        }
    }
}
