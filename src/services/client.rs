//! HTTP client service
//!
//! Encapsulates HTTP communication with the upstream OpenAI-compatible API

use crate::config::Settings;
use crate::models::openai::{ChatRequest, ChatStreamChunk, ModelList, UpstreamErrorResponse};
use anyhow::{Context, Result};
use futures::{Stream, StreamExt};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Resolved upstream endpoint for one request
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    /// API base URL, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    /// Bearer credential; None means the request goes out unauthenticated
    pub api_key: Option<String>,
}

/// Client for the upstream chat completion API
///
/// Holds two reqwest clients: streaming calls get a much longer timeout than
/// plain JSON calls. The playground supplies per-request base URLs and keys,
/// so neither is baked into the client.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    stream_client: Client,
    settings: Settings,
}

impl UpstreamClient {
    /// Create a new client instance
    pub fn new(settings: Settings) -> Result<Self> {
        let user_agent = concat!("playground-proxy/", env!("CARGO_PKG_VERSION"));

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.upstream.timeout))
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        let stream_client = Client::builder()
            .timeout(Duration::from_secs(settings.upstream.stream_timeout))
            .user_agent(user_agent)
            .build()
            .context("Failed to create streaming HTTP client")?;

        Ok(Self {
            client,
            stream_client,
            settings,
        })
    }

    /// Fill in configured defaults for a request-supplied endpoint
    pub fn resolve_target(&self, base_url: Option<&str>, api_key: Option<&str>) -> UpstreamTarget {
        let base_url = base_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(&self.settings.upstream.base_url)
            .trim_end_matches('/')
            .to_string();

        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .map(|k| k.to_string())
            .or_else(|| self.settings.upstream.api_key.clone());

        UpstreamTarget { base_url, api_key }
    }

    /// Configured fallback model name
    pub fn default_model(&self) -> &str {
        &self.settings.upstream.default_model
    }

    /// Open a streaming chat completion call
    ///
    /// Returns after upstream response headers arrive, so connect and auth
    /// failures surface here as a single error before any byte is relayed.
    pub async fn chat_stream(
        &self,
        target: &UpstreamTarget,
        request: ChatRequest,
    ) -> Result<impl Stream<Item = Result<ChatStreamChunk>>> {
        debug!("Opening upstream streaming chat completion call");

        let url = format!("{}/chat/completions", target.base_url);

        let mut builder = self
            .stream_client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream");
        if let Some(key) = &target.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder
            .json(&request)
            .send()
            .await
            .context("Failed to send streaming request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<UpstreamErrorResponse>(&error_text) {
                Ok(parsed) => parsed.error.message,
                Err(_) => error_text,
            };
            anyhow::bail!("Upstream API request failed: {} - {}", status, message);
        }

        let mut buffer = SseBuffer::default();
        let stream = response
            .bytes_stream()
            .map(move |chunk_result| match chunk_result {
                Ok(bytes) => buffer
                    .push(&bytes)
                    .into_iter()
                    .map(Ok)
                    .collect::<Vec<Result<ChatStreamChunk>>>(),
                Err(e) => {
                    vec![Err(anyhow::Error::new(e).context("Failed to read streaming response chunk"))]
                }
            })
            .flat_map(futures::stream::iter);

        Ok(stream)
    }

    /// Get the available models list
    pub async fn list_models(&self, target: &UpstreamTarget) -> Result<Vec<String>> {
        debug!("Fetching upstream models list");

        let url = format!("{}/models", target.base_url);

        let mut builder = self.client.get(&url);
        if let Some(key) = &target.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder.send().await.context("Failed to fetch models list")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to fetch models list: {} - {}", status, error_text);
        }

        let models: ModelList = response
            .json()
            .await
            .context("Failed to parse models list response")?;

        let ids: Vec<String> = models.data.into_iter().map(|m| m.id).collect();
        debug!("Retrieved {} models", ids.len());
        Ok(ids)
    }
}

/// Server-Sent Events re-assembly buffer
///
/// Upstream `data:` lines can be split across transport chunks, and one
/// transport chunk can carry several events. Bytes accumulate here and only
/// complete lines are parsed, so no event is lost or parsed twice.
#[derive(Debug, Default)]
struct SseBuffer {
    pending: Vec<u8>,
    done: bool,
}

impl SseBuffer {
    /// Feed raw bytes, returning every completed stream chunk they finish
    fn push(&mut self, bytes: &[u8]) -> Vec<ChatStreamChunk> {
        if self.done {
            return Vec::new();
        }

        self.pending.extend_from_slice(bytes);

        // Walk completed lines with a cursor and drain once at the end, so
        // a chunk carrying many events costs one pass over the buffer
        let mut chunks = Vec::new();
        let mut consumed = 0;
        while let Some(pos) = self.pending[consumed..].iter().position(|&b| b == b'\n') {
            let end = consumed + pos;
            let line = &self.pending[consumed..end];
            consumed = end + 1;

            let line = match std::str::from_utf8(line) {
                Ok(s) => s.trim_end_matches('\r'),
                Err(e) => {
                    warn!("Skipping non-UTF-8 stream line: {}", e);
                    continue;
                }
            };

            let Some(data) = line.strip_prefix("data:") else {
                // Comment lines, event names and blank separators are ignored
                continue;
            };
            let data = data.trim();

            if data == "[DONE]" {
                debug!("Received streaming response end marker");
                self.done = true;
                break;
            }

            match serde_json::from_str::<ChatStreamChunk>(data) {
                Ok(chunk) => chunks.push(chunk),
                Err(e) => {
                    // Malformed payloads are logged and skipped, never fatal
                    warn!("Failed to parse streaming response chunk: {} - data: {}", e, data);
                }
            }
        }

        if self.done {
            self.pending.clear();
        } else {
            self.pending.drain(..consumed);
        }

        chunks
    }
}
