//! `ctxprof analyze`: optimization statistics for a recorded run.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use super::replay_trace;
use crate::cli::output::{format_ms, output, CommandOutput, TableFormatter};
use crate::domain::models::{AnalysisConfig, CacheStatistics, OptimizationStatistics};
use crate::services::OptimizationAnalyzer;

#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    pub cache: CacheStatistics,
    pub hit_rate: f64,
    pub statistics: OptimizationStatistics,
    pub potential_savings_percentage: f64,
}

impl CommandOutput for AnalyzeOutput {
    fn to_human(&self) -> String {
        let stats = &self.statistics;
        let mut lines = vec!["Context Cache Analysis:".to_string()];
        lines.push(format!("  Contexts created:       {}", self.cache.contexts_created));
        lines.push(format!(
            "  Cache hits / misses:    {} / {} ({:.1}% hit rate)",
            self.cache.hits, self.cache.misses, self.hit_rate
        ));
        lines.push(format!(
            "  Total creation time:    {}",
            format_ms(stats.total_context_creation_time_ms)
        ));
        lines.push(format!("  Wasted time:            {}", format_ms(stats.wasted_time_ms)));
        lines.push(format!(
            "  Potential savings:      {} ({:.1}%)",
            format_ms(stats.potential_time_savings_ms),
            self.potential_savings_percentage
        ));

        if stats.top_opportunities.is_empty() {
            lines.push(String::new());
            lines.push("No optimization opportunities found.".to_string());
        } else {
            lines.push(String::new());
            lines.push("Top opportunities:".to_string());
            lines.push(TableFormatter::new().format_opportunities(&stats.top_opportunities));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Builds the analysis report for a trace.
pub fn run(trace: &Path, config: &AnalysisConfig) -> Result<AnalyzeOutput> {
    let (_, tracker) = replay_trace(trace)?;
    let statistics = OptimizationAnalyzer::new(config.clone()).analyze(&tracker);
    let cache = tracker.statistics();

    Ok(AnalyzeOutput {
        cache,
        hit_rate: cache.hit_rate(),
        potential_savings_percentage: statistics.potential_savings_percentage(),
        statistics,
    })
}

pub fn execute(trace: &Path, config: &AnalysisConfig, json: bool) -> Result<()> {
    output(&run(trace, config)?, json);
    Ok(())
}
