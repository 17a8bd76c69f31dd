//! Optimization statistics over a tracker's created entries.
//!
//! All figures are derived from entries whose environment was actually
//! built; placeholders are ignored. With nothing built every figure is zero
//! and the opportunity list is empty.

use std::collections::HashSet;
use std::sync::Arc;

use super::CacheTracker;
use crate::domain::models::{
    AnalysisConfig, ConfigurationFingerprint, EntrySnapshot, OptimizationOpportunity,
    OptimizationStatistics, RecommendationKind,
};

/// Derives [`OptimizationStatistics`] from cache entries.
#[derive(Debug, Clone, Default)]
pub struct OptimizationAnalyzer {
    config: AnalysisConfig,
}

impl OptimizationAnalyzer {
    pub const fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyzes the tracker's current state.
    pub fn analyze(&self, tracker: &CacheTracker) -> OptimizationStatistics {
        self.analyze_entries(&tracker.created_entries())
    }

    /// Analyzes a set of entry snapshots. Entries that were not created are
    /// skipped; the rest are expected in creation order, which breaks ties
    /// in the ranking.
    pub fn analyze_entries(&self, entries: &[EntrySnapshot]) -> OptimizationStatistics {
        let created: Vec<&EntrySnapshot> = entries.iter().filter(|e| e.created).collect();
        if created.is_empty() {
            return OptimizationStatistics::default();
        }

        let created_fingerprints: HashSet<&ConfigurationFingerprint> =
            created.iter().map(|e| e.fingerprint.as_ref()).collect();

        let stats = OptimizationStatistics {
            total_context_creation_time_ms: created.iter().map(|e| e.load_duration_ms).sum(),
            potential_time_savings_ms: potential_savings(&created, &created_fingerprints),
            wasted_time_ms: self.wasted_time(&created),
            contexts_created: created.len(),
            top_opportunities: self.opportunities(&created),
        };

        tracing::debug!(
            contexts_created = stats.contexts_created,
            total_ms = stats.total_context_creation_time_ms,
            savings_ms = stats.potential_time_savings_ms,
            wasted_ms = stats.wasted_time_ms,
            opportunities = stats.top_opportunities.len(),
            "computed optimization statistics"
        );

        stats
    }

    /// Time spent beyond the tolerated baseline by slow creations.
    fn wasted_time(&self, created: &[&EntrySnapshot]) -> u64 {
        let baseline = self.config.wasted_time_baseline_ms;
        created
            .iter()
            .filter(|e| e.load_duration_ms > baseline)
            .map(|e| e.load_duration_ms - baseline)
            .sum()
    }

    /// Slowest creations above the opportunity floor, slowest first.
    fn opportunities(&self, created: &[&EntrySnapshot]) -> Vec<OptimizationOpportunity> {
        let mut candidates: Vec<&EntrySnapshot> = created
            .iter()
            .copied()
            .filter(|e| e.load_duration_ms > self.config.opportunity_floor_ms)
            .collect();
        // Stable: equal durations keep creation order.
        candidates.sort_by(|a, b| b.load_duration_ms.cmp(&a.load_duration_ms));

        candidates
            .into_iter()
            .take(self.config.top_opportunities)
            .map(|entry| {
                let kind = self.classify(entry);
                OptimizationOpportunity {
                    context_id: entry.context_id.clone(),
                    test_unit: entry
                        .representative_consumer()
                        .unwrap_or(entry.context_id.as_str())
                        .to_string(),
                    load_duration_ms: entry.load_duration_ms,
                    unit_count: entry.size_proxy_count,
                    kind,
                    recommendation: recommendation_text(kind, entry),
                }
            })
            .collect()
    }

    fn classify(&self, entry: &EntrySnapshot) -> RecommendationKind {
        if entry.nearest.is_some() {
            RecommendationKind::Harmonize
        } else if entry.size_proxy_count > self.config.large_context_units {
            RecommendationKind::LargeContext
        } else if entry.load_duration_ms > self.config.slow_load_threshold_ms {
            RecommendationKind::SlowLoad
        } else {
            RecommendationKind::General
        }
    }
}

/// Upper bound on recoverable time: every entry whose nearest neighbour was
/// built could have reused it. The neighbour's own cost is not subtracted.
fn potential_savings(
    created: &[&EntrySnapshot],
    created_fingerprints: &HashSet<&ConfigurationFingerprint>,
) -> u64 {
    created
        .iter()
        .filter(|e| {
            e.nearest
                .as_ref()
                .is_some_and(|n: &Arc<ConfigurationFingerprint>| {
                    created_fingerprints.contains(n.as_ref())
                })
        })
        .map(|e| e.load_duration_ms)
        .sum()
}

fn recommendation_text(kind: RecommendationKind, entry: &EntrySnapshot) -> String {
    match kind {
        RecommendationKind::Harmonize => format!(
            "Consider harmonizing with similar context to save {}ms",
            entry.load_duration_ms
        ),
        RecommendationKind::LargeContext => format!(
            "Large context ({} units) - consider a narrower test configuration to reduce scope",
            entry.size_proxy_count
        ),
        RecommendationKind::SlowLoad => format!(
            "Slow context load ({}ms) - review component scanning and auto-configuration",
            entry.load_duration_ms
        ),
        RecommendationKind::General => {
            "Consider optimizing test setup to reduce context load time".to_string()
        }
    }
}
