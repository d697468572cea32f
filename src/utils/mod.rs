//! Utility modules
//!
//! Error handling and logging helpers shared across the service

pub mod error;
pub mod logging;
