//! Logging utilities
//!
//! Subscriber setup plus helpers for request summaries that are safe to log

use crate::models::playground::CompletionRequest;
use tracing::info;

/// Initialize the logging system
///
/// Text format for development, JSON when LOG_FORMAT=json.
pub fn init_logging() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = if log_format == "json" {
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(log_level)
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .finish(),
        )
    } else {
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(log_level)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish(),
        )
    };

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("Logging system initialized");
}

/// Truncate a string with a note about original length
fn truncate_content(s: &str, max_len: usize) -> String {
    if s.len() > max_len {
        let mut end = max_len;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... ({} chars truncated)", &s[..end], s.len() - end)
    } else {
        s.to_string()
    }
}

/// Redact an API key down to a recognizable prefix
///
/// Keys must never reach the logs in full.
pub fn redact_api_key(key: &str) -> String {
    if key.len() <= 8 {
        "***".to_string()
    } else {
        format!("{}***", &key[..6])
    }
}

/// Create a filtered summary of a completion request for logging
///
/// Keeps the parameters, truncates prompt content, drops the API key entirely.
pub fn create_completion_log_summary(request: &CompletionRequest) -> serde_json::Value {
    serde_json::json!({
        "baseUrl": request.base_url,
        "model": request.model,
        "maxTokens": request.max_tokens,
        "temperature": request.temperature,
        "prompt": truncate_content(&request.prompt, 200),
        "systemPrompt": request.system_prompt.as_deref().map(|s| truncate_content(s, 100)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_content() {
        assert_eq!(truncate_content("short", 200), "short");

        let long = "x".repeat(250);
        let truncated = truncate_content(&long, 200);
        assert!(truncated.starts_with(&"x".repeat(200)));
        assert!(truncated.contains("50 chars truncated"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        // 'é' is two bytes; truncation must not split it
        let s = "é".repeat(120);
        let truncated = truncate_content(&s, 201);
        assert!(truncated.contains("truncated"));
    }

    #[test]
    fn test_redact_api_key() {
        assert_eq!(redact_api_key("sk-abcdef1234567890"), "sk-abc***");
        assert_eq!(redact_api_key("short"), "***");
        assert_eq!(redact_api_key(""), "***");
    }

    #[test]
    fn test_completion_log_summary_has_no_key() {
        let request = CompletionRequest {
            base_url: Some("https://api.openai.com/v1".to_string()),
            api_key: Some("sk-secret-key-123456".to_string()),
            model: Some("gpt-4o".to_string()),
            prompt: "Hello".to_string(),
            system_prompt: None,
            max_tokens: Some(100),
            temperature: Some(0.7),
        };

        let summary = create_completion_log_summary(&request);
        let text = summary.to_string();
        assert!(!text.contains("sk-secret-key"));
        assert_eq!(summary["model"], "gpt-4o");
        assert_eq!(summary["prompt"], "Hello");
    }
}
