//! Domain layer for ctxprof
//!
//! This module contains the tracked data model and its error types.

pub mod error;
pub mod models;

// Re-export error types for convenient access
pub use error::TraceError;
