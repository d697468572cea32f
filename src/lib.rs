//! Playground Proxy Library
//!
//! Backend for a chat-completion playground UI: relays streaming completions
//! from any OpenAI-compatible API and proxies its model listing.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::Settings;
pub use handlers::{create_router, AppState};
pub use models::{openai, playground};
pub use services::{UpstreamClient, UsageTracker};
pub use utils::error::{AppError, AppResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
