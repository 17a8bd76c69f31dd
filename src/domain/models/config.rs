use serde::{Deserialize, Serialize};

/// Tolerated creation time before a load counts as waste.
pub const DEFAULT_WASTED_TIME_BASELINE_MS: u64 = 1000;
/// Creations at or below this duration are never ranked as opportunities.
pub const DEFAULT_OPPORTUNITY_FLOOR_MS: u64 = 500;
/// Creations above this duration get the slow-load recommendation.
pub const DEFAULT_SLOW_LOAD_THRESHOLD_MS: u64 = 2000;
/// Environments defining more units than this get the large-context recommendation.
pub const DEFAULT_LARGE_CONTEXT_UNITS: usize = 100;
/// Number of opportunities reported.
pub const DEFAULT_TOP_OPPORTUNITIES: usize = 5;

/// Main configuration structure for ctxprof
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Optimization analysis thresholds
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Log file rotation: daily, hourly or never
    #[serde(default = "default_log_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_log_rotation(),
        }
    }
}

/// Thresholds used by the optimization analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AnalysisConfig {
    /// Creation time tolerated before it counts as wasted
    #[serde(default = "default_wasted_time_baseline_ms")]
    pub wasted_time_baseline_ms: u64,

    /// Minimum creation time (exclusive) for an opportunity
    #[serde(default = "default_opportunity_floor_ms")]
    pub opportunity_floor_ms: u64,

    /// Creation time (exclusive) above which a load is slow
    #[serde(default = "default_slow_load_threshold_ms")]
    pub slow_load_threshold_ms: u64,

    /// Unit count (exclusive) above which an environment is large
    #[serde(default = "default_large_context_units")]
    pub large_context_units: usize,

    /// Number of ranked opportunities to report
    #[serde(default = "default_top_opportunities")]
    pub top_opportunities: usize,
}

const fn default_wasted_time_baseline_ms() -> u64 {
    DEFAULT_WASTED_TIME_BASELINE_MS
}

const fn default_opportunity_floor_ms() -> u64 {
    DEFAULT_OPPORTUNITY_FLOOR_MS
}

const fn default_slow_load_threshold_ms() -> u64 {
    DEFAULT_SLOW_LOAD_THRESHOLD_MS
}

const fn default_large_context_units() -> usize {
    DEFAULT_LARGE_CONTEXT_UNITS
}

const fn default_top_opportunities() -> usize {
    DEFAULT_TOP_OPPORTUNITIES
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            wasted_time_baseline_ms: default_wasted_time_baseline_ms(),
            opportunity_floor_ms: default_opportunity_floor_ms(),
            slow_load_threshold_ms: default_slow_load_threshold_ms(),
            large_context_units: default_large_context_units(),
            top_opportunities: default_top_opportunities(),
        }
    }
}
