pub mod cache_entry;
pub mod config;
pub mod fingerprint;
pub mod optimization;
pub mod timeline;
pub mod trace;

pub use cache_entry::{CacheEntry, CostSnapshot, EntrySnapshot, MethodConsumer};
pub use config::{AnalysisConfig, Config, LoggingConfig};
pub use fingerprint::{short_name, ConfigurationFingerprint, FingerprintSummary};
pub use optimization::{
    CacheStatistics, OptimizationOpportunity, OptimizationStatistics, RecommendationKind,
};
pub use timeline::{TimelineData, TimelineEntry, TimelineEvent};
pub use trace::{TraceDocument, TraceEvent};
