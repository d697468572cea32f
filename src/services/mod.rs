//! Business services module
//!
//! Upstream API communication and usage accounting

pub mod client;
pub mod usage;

pub use client::{UpstreamClient, UpstreamTarget};
pub use usage::{estimate_tokens, UsageTracker};
