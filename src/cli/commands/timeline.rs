//! `ctxprof timeline`: chronological view of environment creations.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use super::replay_trace;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::TimelineData;
use crate::services::TimelineBuilder;

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct TimelineOutput {
    pub timeline: TimelineData,
}

impl CommandOutput for TimelineOutput {
    fn to_human(&self) -> String {
        let Some(start) = self.timeline.start else {
            return "No contexts were created.".to_string();
        };

        let mut lines = vec![format!("Timeline starting {}", start.to_rfc3339())];
        if let Some(end) = self.timeline.end {
            lines.push(format!(
                "Span: {}ms",
                (end - start).num_milliseconds()
            ));
        }
        lines.push(TableFormatter::new().format_timeline(&self.timeline));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.timeline).unwrap_or_default()
    }
}

pub fn run(trace: &Path) -> Result<TimelineOutput> {
    let (_, tracker) = replay_trace(trace)?;
    Ok(TimelineOutput {
        timeline: TimelineBuilder::new().build(&tracker),
    })
}

pub fn execute(trace: &Path, json: bool) -> Result<()> {
    output(&run(trace)?, json);
    Ok(())
}
