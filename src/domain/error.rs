use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or replaying a recorded trace
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Failed to read trace file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON trace: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML trace: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported trace format: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),

    #[error("Event {index} refers to unknown fingerprint '{name}'")]
    UnknownFingerprint { index: usize, name: String },
}
