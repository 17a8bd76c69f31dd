//! Chronological, chart-ready view of environment creations.

use chrono::{DateTime, Utc};

use super::CacheTracker;
use crate::domain::models::{
    short_name, EntrySnapshot, TimelineData, TimelineEntry, TimelineEvent,
};

/// Colors assigned round-robin in creation order.
pub const PALETTE: [&str; 10] = [
    "#e74c3c", "#3498db", "#27ae60", "#f39c12", "#9b59b6", "#e67e22", "#1abc9c", "#34495e",
    "#e91e63", "#ff5722",
];

const CREATION_PHASE: &str = "Creation";

/// Builds [`TimelineData`] from created entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineBuilder;

impl TimelineBuilder {
    pub const fn new() -> Self {
        Self
    }

    pub fn build(&self, tracker: &CacheTracker) -> TimelineData {
        self.build_from_entries(&tracker.created_entries())
    }

    /// Orders created entries by creation time, untimed ones last, and lays
    /// them out relative to the earliest creation.
    pub fn build_from_entries(&self, entries: &[EntrySnapshot]) -> TimelineData {
        let mut created: Vec<&EntrySnapshot> = entries.iter().filter(|e| e.created).collect();
        if created.is_empty() {
            return TimelineData::default();
        }
        // Stable, so untimed entries keep their incoming order at the tail.
        created.sort_by_key(|e| (e.created_at.is_none(), e.created_at));

        let start = created.iter().filter_map(|e| e.created_at).min();
        let end = created.iter().filter_map(|e| e.last_used_at).max();

        let mut data = TimelineData {
            entries: Vec::with_capacity(created.len()),
            start,
            end,
            events: Vec::with_capacity(created.len()),
        };

        for (index, entry) in created.iter().enumerate() {
            let color = PALETTE[index % PALETTE.len()].to_string();
            let label = label_for(entry, index);
            let offset_ms = offset_ms(start, entry.created_at);
            let duration = i64::try_from(entry.load_duration_ms).unwrap_or(i64::MAX);

            data.events.push(TimelineEvent {
                label: label.clone(),
                color: color.clone(),
                relative_start_secs: offset_ms / 1000,
                load_duration_ms: entry.load_duration_ms,
                consumer_count: entry.consumers.len(),
                hit_count: entry.hit_count,
                unit_count: entry.size_proxy_count,
            });

            data.entries.push(TimelineEntry {
                label,
                phase: CREATION_PHASE.to_string(),
                start_ms: offset_ms,
                end_ms: offset_ms.saturating_add(duration),
                color,
                tooltip: format!("{}ms load time", entry.load_duration_ms),
                context_id: entry.context_id.clone(),
            });
        }

        tracing::debug!(events = data.events.len(), "built timeline");
        data
    }
}

fn label_for(entry: &EntrySnapshot, index: usize) -> String {
    entry.representative_consumer().map_or_else(
        || format!("Context {}", index + 1),
        |unit| short_name(unit).to_string(),
    )
}

fn offset_ms(start: Option<DateTime<Utc>>, at: Option<DateTime<Utc>>) -> i64 {
    match (start, at) {
        (Some(start), Some(at)) => (at - start).num_milliseconds(),
        _ => 0,
    }
}
