//! Application configuration settings
//!
//! Defines all configuration structures and loading logic

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// Upstream API configuration
    pub upstream: UpstreamConfig,
    /// Token pricing configuration
    pub pricing: PricingConfig,
    /// Security configuration
    pub security: SecurityConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
}

/// Upstream OpenAI-compatible API configuration
///
/// The playground sends its own baseUrl/apiKey per request; these are the
/// fallbacks used when a request omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Default API base URL
    pub base_url: String,
    /// Default model name
    pub default_model: String,
    /// Default API key (optional; requests without a key fail when unset)
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Streaming request timeout in seconds
    pub stream_timeout: u64,
}

/// Fixed per-1000-token rates used for the trailing cost summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// USD per 1000 input tokens
    pub input_per_1k: f64,
    /// USD per 1000 output tokens
    pub output_per_1k: f64,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Allowed origins for CORS
    pub allowed_origins: Vec<String>,
    /// Whether CORS is enabled
    pub cors_enabled: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Settings {
    /// Create a new configuration instance from environment variables
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let settings = Self {
            server: ServerConfig {
                host: get_env_or_default("SERVER_HOST", "0.0.0.0"),
                port: get_env_or_default("SERVER_PORT", "8080")
                    .parse()
                    .context("Invalid port number")?,
            },
            upstream: UpstreamConfig {
                base_url: get_env_or_default("UPSTREAM_BASE_URL", "https://api.openai.com/v1"),
                default_model: get_env_or_default("UPSTREAM_DEFAULT_MODEL", "gpt-3.5-turbo"),
                api_key: std::env::var("UPSTREAM_API_KEY").ok().filter(|k| !k.is_empty()),
                timeout: get_env_or_default("REQUEST_TIMEOUT", "30")
                    .parse()
                    .context("Invalid timeout value")?,
                stream_timeout: get_env_or_default("STREAM_TIMEOUT", "300")
                    .parse()
                    .context("Invalid streaming timeout value")?,
            },
            pricing: PricingConfig {
                input_per_1k: get_env_or_default("PRICE_INPUT_PER_1K", "0.0015")
                    .parse()
                    .context("Invalid input token rate")?,
                output_per_1k: get_env_or_default("PRICE_OUTPUT_PER_1K", "0.002")
                    .parse()
                    .context("Invalid output token rate")?,
            },
            security: SecurityConfig {
                allowed_origins: get_env_or_default("ALLOWED_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
                cors_enabled: get_env_or_default("CORS_ENABLED", "true")
                    .parse()
                    .context("Invalid CORS enabled flag")?,
            },
            logging: LoggingConfig {
                level: get_env_or_default("RUST_LOG", "info"),
                format: get_env_or_default("LOG_FORMAT", "text"),
            },
        };

        // Validate configuration
        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Port number cannot be 0");
        }

        if !self.upstream.base_url.starts_with("http") {
            anyhow::bail!("Invalid upstream base URL format, should start with 'http'");
        }

        if self.upstream.default_model.is_empty() {
            anyhow::bail!("Default model name cannot be empty");
        }

        // Default key is optional, but when present must look like a credential
        if let Some(key) = &self.upstream.api_key {
            if key.contains(char::is_whitespace) {
                anyhow::bail!("Upstream API key cannot contain whitespace characters");
            }
            if key.len() < 8 {
                anyhow::bail!("Upstream API key must be at least 8 characters long");
            }
        }

        if self.upstream.timeout == 0 || self.upstream.stream_timeout == 0 {
            anyhow::bail!("Timeout values cannot be 0");
        }

        if self.pricing.input_per_1k < 0.0 || self.pricing.output_per_1k < 0.0 {
            anyhow::bail!("Token rates cannot be negative");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }
}

/// Get environment variable or default value
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
