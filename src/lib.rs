//! ctxprof - cache-efficiency analysis for reusable test environments
//!
//! Test suites that build expensive, long-lived environments (application
//! wiring contexts and the like) keyed by a configuration fingerprint can
//! report every build and reuse to a [`CacheTracker`]. At suite end the
//! tracker's state is summarized into [`OptimizationStatistics`] and a
//! [`TimelineData`] chart model.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): fingerprints, cache entries and derived report models
//! - **Service Layer** (`services`): the concurrent tracker, similarity scoring and analyzers
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): trace replay from the command line
//!
//! # Example
//!
//! ```
//! use ctxprof::{CacheTracker, ConfigurationFingerprint, CostSnapshot, OptimizationAnalyzer};
//!
//! let tracker = CacheTracker::new();
//! let fingerprint = ConfigurationFingerprint::new(["app.WebConfig"]).with_profiles(["test"]);
//!
//! tracker.register_consumer(&fingerprint, "app.OrderControllerTest");
//! tracker.record_creation(&fingerprint, 1500, CostSnapshot::capture());
//! tracker.register_consumer(&fingerprint, "app.CustomerControllerTest");
//! tracker.record_hit(&fingerprint);
//!
//! let stats = OptimizationAnalyzer::default().analyze(&tracker);
//! assert_eq!(stats.wasted_time_ms, 500);
//! assert_eq!(tracker.cache_hits(), 1);
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    AnalysisConfig, CacheStatistics, Config, ConfigurationFingerprint, CostSnapshot,
    EntrySnapshot, LoggingConfig, OptimizationOpportunity, OptimizationStatistics,
    RecommendationKind, TimelineData, TimelineEntry, TimelineEvent, TraceDocument, TraceEvent,
};
pub use domain::TraceError;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{similarity, CacheTracker, OptimizationAnalyzer, TimelineBuilder};
