//! `ctxprof entries`: every cache entry with its counters.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use super::replay_trace;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::EntrySnapshot;

#[derive(Debug, Serialize)]
pub struct EntriesOutput {
    pub entries: Vec<EntrySnapshot>,
    pub total: usize,
}

impl CommandOutput for EntriesOutput {
    fn to_human(&self) -> String {
        if self.entries.is_empty() {
            return "No cache entries.".to_string();
        }
        format!(
            "{}\n{} entries",
            TableFormatter::new().format_entries(&self.entries),
            self.total
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn run(trace: &Path, created_only: bool) -> Result<EntriesOutput> {
    let (_, tracker) = replay_trace(trace)?;
    let entries = if created_only {
        tracker.created_entries()
    } else {
        tracker.all_entries()
    };
    Ok(EntriesOutput {
        total: entries.len(),
        entries,
    })
}

pub fn execute(trace: &Path, created_only: bool, json: bool) -> Result<()> {
    output(&run(trace, created_only)?, json);
    Ok(())
}
