//! Analysis services: the concurrent cache tracker and the views derived
//! from it.

pub mod cache_tracker;
pub mod optimization_analyzer;
pub mod similarity;
pub mod timeline_builder;
pub mod trace_replay;

pub use cache_tracker::CacheTracker;
pub use optimization_analyzer::OptimizationAnalyzer;
pub use timeline_builder::TimelineBuilder;
pub use trace_replay::{load_trace, replay};
