//! Data models module
//!
//! Playground-facing and upstream-facing wire structures

pub mod openai;
pub mod playground;
