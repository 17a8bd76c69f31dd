//! Infrastructure layer module
//!
//! Host-facing concerns kept out of the analysis engine:
//! - Configuration management
//! - Logging infrastructure

pub mod config;
pub mod logging;
