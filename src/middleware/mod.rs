//! Middleware module
//!
//! Request logging layered onto the router

pub mod logging;

pub use logging::request_logging_middleware;
