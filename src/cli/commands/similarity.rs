//! `ctxprof similarity`: score two fingerprints declared in a trace.

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::path::Path;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{FingerprintSummary, TraceDocument};
use crate::services::{similarity, trace_replay};

#[derive(Debug, Serialize)]
pub struct SimilarityOutput {
    pub a: String,
    pub b: String,
    pub score: u32,
    pub a_summary: FingerprintSummary,
    pub b_summary: FingerprintSummary,
}

impl CommandOutput for SimilarityOutput {
    fn to_human(&self) -> String {
        let describe = |name: &str, summary: &FingerprintSummary| {
            let profiles = if summary.active_profiles.is_empty() {
                "-".to_string()
            } else {
                summary.active_profiles.join(", ")
            };
            format!(
                "  {name}: classes [{}], profiles [{profiles}], loader {}, {} properties",
                summary.wiring_classes.join(", "),
                summary.loader.as_deref().unwrap_or("-"),
                summary.property_count
            )
        };

        [
            format!("Similarity score: {}", self.score),
            describe(&self.a, &self.a_summary),
            describe(&self.b, &self.b_summary),
        ]
        .join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Scores two named fingerprints. Only the trace's declarations are read;
/// its events are not replayed.
pub fn run(trace: &Path, a: &str, b: &str) -> Result<SimilarityOutput> {
    let document = trace_replay::load_trace(trace)?;
    compare(&document, a, b)
}

pub fn compare(document: &TraceDocument, a: &str, b: &str) -> Result<SimilarityOutput> {
    let lookup = |name: &str| {
        document
            .fingerprints
            .get(name)
            .ok_or_else(|| anyhow!("Fingerprint '{name}' is not declared in the trace"))
    };
    let (left, right) = (lookup(a)?, lookup(b)?);

    Ok(SimilarityOutput {
        a: a.to_string(),
        b: b.to_string(),
        score: similarity::score(left, right),
        a_summary: left.summary(),
        b_summary: right.summary(),
    })
}

pub fn execute(trace: &Path, a: &str, b: &str, json: bool) -> Result<()> {
    output(&run(trace, a, b)?, json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_unknown_name() {
        let document = TraceDocument::default();
        let err = compare(&document, "web", "db").unwrap_err();
        assert!(err.to_string().contains("'web'"));
    }
}
