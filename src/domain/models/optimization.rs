//! Optimization statistics derived from the tracker's created entries.

use serde::Serialize;
use std::fmt;

/// Which of the four recommendations an opportunity carries.
///
/// Variants are listed in precedence order: the analyzer picks the first one
/// that applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// A similar environment already exists; merge the two configurations.
    Harmonize,
    /// The environment defines many units; narrow its scope.
    LargeContext,
    /// The environment is slow to build on its own.
    SlowLoad,
    /// Nothing specific; generic setup advice.
    General,
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Harmonize => write!(f, "harmonize"),
            Self::LargeContext => write!(f, "large-context"),
            Self::SlowLoad => write!(f, "slow-load"),
            Self::General => write!(f, "general"),
        }
    }
}

/// One ranked opportunity for a human to act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizationOpportunity {
    /// Context id of the entry the opportunity refers to.
    pub context_id: String,
    /// Representative consuming test unit.
    pub test_unit: String,
    pub load_duration_ms: u64,
    /// Size proxy (unit/bean count) of the environment.
    pub unit_count: usize,
    pub kind: RecommendationKind,
    pub recommendation: String,
}

/// Aggregate statistics over all created entries.
///
/// Every field is zero or empty when nothing was created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptimizationStatistics {
    pub total_context_creation_time_ms: u64,
    /// Upper bound on time recoverable by merging every entry that has a
    /// nearest neighbour into it.
    pub potential_time_savings_ms: u64,
    /// Time spent beyond the tolerated baseline by slow creations.
    pub wasted_time_ms: u64,
    pub contexts_created: usize,
    pub top_opportunities: Vec<OptimizationOpportunity>,
}

impl OptimizationStatistics {
    /// Potential savings as a percentage of total creation time.
    #[allow(clippy::cast_precision_loss)]
    pub fn potential_savings_percentage(&self) -> f64 {
        if self.total_context_creation_time_ms == 0 {
            return 0.0;
        }
        self.potential_time_savings_ms as f64 * 100.0
            / self.total_context_creation_time_ms as f64
    }
}

/// Global hit/miss counters of a tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStatistics {
    pub contexts_created: u64,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStatistics {
    pub const fn total_accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hit rate in percent; 0 with no accesses.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_accesses();
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 * 100.0 / total as f64
    }
}
