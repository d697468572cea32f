//! Completion relay handler
//!
//! Forwards a streaming chat completion from the upstream API to the browser
//! as plain text, fragment by fragment, then appends one newline-prefixed
//! JSON usage summary line.

use crate::config::PricingConfig;
use crate::handlers::AppState;
use crate::models::openai::{ChatMessage, ChatRequest, ChatStreamChunk, StreamOptions};
use crate::models::playground::{CompletionRequest, StreamErrorMarker};
use crate::services::UsageTracker;
use crate::utils::error::{classify_upstream_error, AppError};
use crate::utils::logging::{create_completion_log_summary, redact_api_key};
use anyhow::Result;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::Response,
    Json,
};
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error};

/// Handle completion relay requests
///
/// POST /completion
///
/// The upstream call is opened before the response starts, so connect and
/// auth failures come back as a single JSON error with no partial stream.
pub async fn handle_completion(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CompletionRequest>,
) -> Result<Response, AppError> {
    if let Ok(summary_json) = serde_json::to_string(&create_completion_log_summary(&request)) {
        debug!("Completion request: {}", summary_json);
    }

    let target = state
        .client
        .resolve_target(request.base_url.as_deref(), request.api_key.as_deref());

    if let Err(message) = validate_completion_request(&request, target.api_key.is_some()) {
        return Err(AppError::Validation(message));
    }

    debug!(
        "Resolved upstream target: {} (key: {})",
        target.base_url,
        target
            .api_key
            .as_deref()
            .map(redact_api_key)
            .unwrap_or_default()
    );

    let model = request
        .model
        .clone()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| state.client.default_model().to_string());

    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &request.system_prompt {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: system.clone(),
        });
    }
    messages.push(ChatMessage {
        role: "user".to_string(),
        content: request.prompt.clone(),
    });

    let chat_request = ChatRequest {
        model,
        messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        stream: true,
        stream_options: Some(StreamOptions { include_usage: true }),
    };

    let upstream = match state.client.chat_stream(&target, chat_request).await {
        Ok(stream) => stream,
        Err(e) => {
            error!("Upstream streaming call failed: {}", e);
            return Err(classify_upstream_error(&e.to_string()));
        }
    };

    let tracker = UsageTracker::new(&request.prompt, request.system_prompt.as_deref());
    let pricing = state.settings.pricing.clone();
    let (tx, rx) = mpsc::channel::<Result<Bytes, axum::Error>>(100);

    tokio::spawn(relay_stream(upstream, tx, tracker, pricing));

    debug!("Starting streaming response transmission");
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from_stream(ReceiverStream::new(rx)))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(response)
}

/// Relay loop: one upstream stream in, one downstream channel out
///
/// Content stops being forwarded once a finish reason arrives, but the
/// upstream keeps being drained so a trailing usage-only chunk still lands
/// in the summary. A send failure means the browser went away; the upstream
/// stream is dropped and nothing more is pulled.
async fn relay_stream(
    upstream: impl Stream<Item = Result<ChatStreamChunk>>,
    tx: mpsc::Sender<Result<Bytes, axum::Error>>,
    mut tracker: UsageTracker,
    pricing: PricingConfig,
) {
    let mut upstream = Box::pin(upstream);
    let mut finished = false;

    while let Some(chunk_result) = upstream.next().await {
        match chunk_result {
            Ok(chunk) => {
                if let Some(usage) = chunk.usage.clone() {
                    tracker.record_reported(usage);
                }

                if chunk.finish_reason().is_some() {
                    debug!("Upstream signaled completion: {:?}", chunk.finish_reason());
                    finished = true;
                    continue;
                }

                if finished {
                    continue;
                }

                if let Some(text) = chunk.delta_text() {
                    tracker.add_output(text);
                    let fragment = Bytes::from(text.to_owned());
                    if tx.send(Ok(fragment)).await.is_err() {
                        debug!("Client disconnected, releasing upstream stream");
                        return;
                    }
                }
            }
            Err(e) => {
                // Mid-stream transport failure: surface an explicit error
                // marker as the final line instead of a usage summary
                error!("Upstream streaming response error: {}", e);
                let marker = StreamErrorMarker {
                    error: e.to_string(),
                };
                if let Ok(json) = serde_json::to_string(&marker) {
                    let _ = tx.send(Ok(Bytes::from(format!("\n{}", json)))).await;
                }
                return;
            }
        }
    }

    let summary = tracker.finish(&pricing);
    match serde_json::to_string(&summary) {
        Ok(json) => {
            let _ = tx.send(Ok(Bytes::from(format!("\n{}", json)))).await;
        }
        Err(e) => error!("Usage summary serialization failed: {}", e),
    }
}

/// Validate a completion request
fn validate_completion_request(
    request: &CompletionRequest,
    has_api_key: bool,
) -> Result<(), String> {
    if !has_api_key {
        return Err("apiKey is required".to_string());
    }

    if request.prompt.trim().is_empty() {
        return Err("prompt cannot be empty".to_string());
    }

    if let Some(max_tokens) = request.max_tokens {
        if max_tokens == 0 {
            return Err("maxTokens must be greater than 0".to_string());
        }
        if max_tokens > 100000 {
            return Err("maxTokens cannot exceed 100000".to_string());
        }
    }

    if let Some(temp) = request.temperature {
        if !(0.0..=2.0).contains(&temp) {
            return Err("temperature must be between 0.0 and 2.0".to_string());
        }
    }

    Ok(())
}
