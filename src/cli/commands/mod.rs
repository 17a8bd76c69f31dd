//! Subcommand implementations. Each one replays a trace and renders one view
//! of the resulting tracker.

pub mod analyze;
pub mod entries;
pub mod similarity;
pub mod timeline;

use anyhow::{Context, Result};
use std::path::Path;

use crate::domain::models::TraceDocument;
use crate::services::{trace_replay, CacheTracker};

/// Loads and replays a trace file.
pub(crate) fn replay_trace(path: &Path) -> Result<(TraceDocument, CacheTracker)> {
    let document = trace_replay::load_trace(path)
        .with_context(|| format!("Failed to load trace {}", path.display()))?;
    let tracker = trace_replay::replay(&document)
        .with_context(|| format!("Failed to replay trace {}", path.display()))?;
    Ok((document, tracker))
}
