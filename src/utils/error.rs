//! Error handling module
//!
//! Defines error types and handling logic used in the project

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Request validation failed
    #[error("Request validation failed: {0}")]
    Validation(String),

    /// Upstream API error
    #[error("Upstream API error: {0}")]
    Upstream(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, please try again later")]
    RateLimit,

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),
}

/// JSON error body returned to the playground UI
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl AppError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::HttpClient(_)
            | AppError::Serialization(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error type string for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Authentication(_) => "authentication_error",
            AppError::Validation(_) => "invalid_request_error",
            AppError::NotFound(_) => "not_found_error",
            AppError::RateLimit => "rate_limit_error",
            AppError::Timeout => "timeout_error",
            AppError::Upstream(_) => "upstream_error",
            AppError::Config(_)
            | AppError::HttpClient(_)
            | AppError::Serialization(_)
            | AppError::Internal(_) => "api_error",
        }
    }

    /// Whether detailed error information should be logged
    pub fn should_log_details(&self) -> bool {
        !matches!(self, AppError::Authentication(_))
    }
}

/// Implement IntoResponse trait to allow errors to be returned directly as HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.should_log_details() {
            tracing::error!("Application error: {} - Status code: {}", self, status);
        } else {
            tracing::warn!("Client error: {} - Status code: {}", self.error_type(), status);
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Map an upstream failure message to a typed error.
///
/// Connect-phase failures of the completion relay carry whatever text the
/// upstream returned; classify by the usual status markers.
pub fn classify_upstream_error(message: &str) -> AppError {
    if message.contains("429")
        || message.contains("Too Many Requests")
        || message.contains("rate_limit")
    {
        AppError::RateLimit
    } else if message.contains("401")
        || message.contains("Unauthorized")
        || message.contains("Invalid API key")
        || message.contains("invalid_api_key")
    {
        AppError::Authentication("Invalid API key provided".to_string())
    } else if message.contains("404") || message.contains("model_not_found") {
        AppError::NotFound("The requested model was not found".to_string())
    } else if message.contains("400") || message.contains("Bad Request") {
        AppError::Validation("Bad request to upstream API".to_string())
    } else {
        AppError::Upstream(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::Authentication("test".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Validation("test".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("test".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::RateLimit.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            AppError::Upstream("test".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Internal("test".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            AppError::Authentication("test".to_string()).error_type(),
            "authentication_error"
        );
        assert_eq!(
            AppError::Validation("test".to_string()).error_type(),
            "invalid_request_error"
        );
        assert_eq!(AppError::RateLimit.error_type(), "rate_limit_error");
        assert_eq!(AppError::Internal("test".to_string()).error_type(), "api_error");
    }

    #[test]
    fn test_classify_upstream_error() {
        assert!(matches!(
            classify_upstream_error("upstream returned 429 Too Many Requests"),
            AppError::RateLimit
        ));
        assert!(matches!(
            classify_upstream_error("401 Unauthorized: Invalid API key"),
            AppError::Authentication(_)
        ));
        assert!(matches!(
            classify_upstream_error("404 model_not_found"),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            classify_upstream_error("connection refused"),
            AppError::Upstream(_)
        ));
    }

    #[test]
    fn test_error_response_body() {
        let err = AppError::Validation("apiKey is required".to_string());
        let body = ErrorResponse {
            error: err.to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("apiKey is required"));
    }
}
