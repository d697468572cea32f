//! Playground API data models
//!
//! Request and response structures exchanged with the browser UI.
//! Wire names are camelCase to match the playground's JSON.

use serde::{Deserialize, Serialize};

/// Completion relay request
///
/// POST /completion body. Everything except the prompt is optional; baseUrl,
/// model and apiKey fall back to server defaults when omitted.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    /// Upstream API base URL (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Upstream API key (optional when the server has a default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model name (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// User prompt
    pub prompt: String,
    /// System prompt prepended as a system-role message (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Model listing request
///
/// POST /models body.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModelsRequest {
    /// Upstream API base URL (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Upstream API key (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Token and cost summary appended as the final line of a relayed stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    /// Prompt-side token count
    pub input_tokens: u32,
    /// Completion-side token count
    pub output_tokens: u32,
    /// Total cost in USD at the configured per-1k rates
    pub total_cost: f64,
}

/// Trailing error marker emitted when the upstream stream fails mid-relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamErrorMarker {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_request_camel_case() {
        let json = r#"{
            "baseUrl": "https://api.openai.com/v1",
            "apiKey": "sk-test",
            "model": "gpt-4o",
            "prompt": "Hello",
            "systemPrompt": "You are terse.",
            "maxTokens": 100,
            "temperature": 0.7
        }"#;

        let request: CompletionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.base_url.as_deref(), Some("https://api.openai.com/v1"));
        assert_eq!(request.api_key.as_deref(), Some("sk-test"));
        assert_eq!(request.model.as_deref(), Some("gpt-4o"));
        assert_eq!(request.prompt, "Hello");
        assert_eq!(request.system_prompt.as_deref(), Some("You are terse."));
        assert_eq!(request.max_tokens, Some(100));
        assert_eq!(request.temperature, Some(0.7));
    }

    #[test]
    fn test_completion_request_minimal() {
        let request: CompletionRequest = serde_json::from_str(r#"{"prompt": "Hi"}"#).unwrap();
        assert_eq!(request.prompt, "Hi");
        assert!(request.api_key.is_none());
        assert!(request.base_url.is_none());
        assert!(request.model.is_none());
    }

    #[test]
    fn test_usage_summary_wire_names() {
        let summary = UsageSummary {
            input_tokens: 12,
            output_tokens: 34,
            total_cost: 0.086,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["inputTokens"], 12);
        assert_eq!(json["outputTokens"], 34);
        assert!((json["totalCost"].as_f64().unwrap() - 0.086).abs() < 1e-12);
    }

    #[test]
    fn test_models_request_empty_body() {
        let request: ModelsRequest = serde_json::from_str("{}").unwrap();
        assert!(request.base_url.is_none());
        assert!(request.api_key.is_none());
    }
}
