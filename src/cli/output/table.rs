//! Table output formatting for CLI commands
//!
//! Renders opportunities, cache entries and timeline rows with comfy-table.
//! Colors are dropped when `NO_COLOR` is set or the terminal is dumb.

use crate::domain::models::{
    short_name, EntrySnapshot, OptimizationOpportunity, RecommendationKind, TimelineData,
};
use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::env;

use super::{format_ms, truncate};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Ranked optimization opportunities
    pub fn format_opportunities(&self, opportunities: &[OptimizationOpportunity]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["#", "Test unit", "Load", "Units", "Kind", "Recommendation"]));

        for (rank, opportunity) in opportunities.iter().enumerate() {
            let kind_cell = if self.use_colors {
                Cell::new(opportunity.kind.to_string()).fg(kind_color(opportunity.kind))
            } else {
                Cell::new(opportunity.kind.to_string())
            };

            table.add_row(vec![
                Cell::new(rank + 1).set_alignment(CellAlignment::Right),
                Cell::new(truncate(short_name(&opportunity.test_unit), 40)),
                Cell::new(format_ms(opportunity.load_duration_ms))
                    .set_alignment(CellAlignment::Right),
                Cell::new(opportunity.unit_count).set_alignment(CellAlignment::Right),
                kind_cell,
                Cell::new(&opportunity.recommendation),
            ]);
        }

        table.to_string()
    }

    /// Cache entries with their lifecycle counters
    pub fn format_entries(&self, entries: &[EntrySnapshot]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&[
            "Context", "Test unit", "Created", "Load", "Hits", "Consumers", "Units", "Nearest",
        ]));

        for entry in entries {
            let unit = entry
                .representative_consumer()
                .map_or_else(|| "-".to_string(), |u| truncate(short_name(u), 32));
            let created = if entry.created { "yes" } else { "no" };
            let created_cell = if self.use_colors {
                Cell::new(created).fg(if entry.created { Color::Green } else { Color::DarkGrey })
            } else {
                Cell::new(created)
            };
            let nearest = match (&entry.nearest, entry.nearest_score) {
                (Some(fp), Some(score)) => {
                    let classes = fp.summary().wiring_classes.join(", ");
                    format!("{} (score {score})", truncate(&classes, 30))
                }
                _ => "-".to_string(),
            };

            table.add_row(vec![
                Cell::new(&entry.context_id),
                Cell::new(unit),
                created_cell,
                Cell::new(format_ms(entry.load_duration_ms)).set_alignment(CellAlignment::Right),
                Cell::new(entry.hit_count).set_alignment(CellAlignment::Right),
                Cell::new(entry.consumers.len()).set_alignment(CellAlignment::Right),
                Cell::new(entry.size_proxy_count).set_alignment(CellAlignment::Right),
                Cell::new(nearest),
            ]);
        }

        table.to_string()
    }

    /// One row per creation, offsets relative to the first creation
    pub fn format_timeline(&self, timeline: &TimelineData) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&["Label", "Phase", "Start", "End", "Hits", "Color"]));

        for (row, event) in timeline.entries.iter().zip(&timeline.events) {
            table.add_row(vec![
                Cell::new(truncate(&row.label, 40)),
                Cell::new(&row.phase),
                Cell::new(format!("+{}ms", row.start_ms)).set_alignment(CellAlignment::Right),
                Cell::new(format!("+{}ms", row.end_ms)).set_alignment(CellAlignment::Right),
                Cell::new(event.hit_count).set_alignment(CellAlignment::Right),
                Cell::new(&row.color),
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }
        if !self.use_colors {
            table.force_no_tty();
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).add_attribute(Attribute::Bold))
        .collect()
}

/// Check if the terminal supports colors
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

const fn kind_color(kind: RecommendationKind) -> Color {
    match kind {
        RecommendationKind::Harmonize => Color::Green,
        RecommendationKind::LargeContext => Color::Magenta,
        RecommendationKind::SlowLoad => Color::Red,
        RecommendationKind::General => Color::Yellow,
    }
}
