//! Chart-ready timeline of environment creations.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One environment creation, positioned for a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEvent {
    pub label: String,
    pub color: String,
    /// Whole seconds since the first creation.
    pub relative_start_secs: i64,
    pub load_duration_ms: u64,
    pub consumer_count: usize,
    pub hit_count: u64,
    pub unit_count: usize,
}

/// One phase row of the timeline table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub label: String,
    pub phase: String,
    /// Milliseconds since the first creation.
    pub start_ms: i64,
    pub end_ms: i64,
    pub color: String,
    pub tooltip: String,
    pub context_id: String,
}

impl TimelineEntry {
    pub const fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}

/// Timeline of all created entries, ordered by creation time.
///
/// `start` and `end` are `None` when nothing was created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimelineData {
    pub entries: Vec<TimelineEntry>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub events: Vec<TimelineEvent>,
}

impl TimelineData {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
