use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid top_opportunities: {0}. Must be at least 1")]
    InvalidTopOpportunities(usize),

    #[error(
        "Invalid thresholds: opportunity_floor_ms ({0}) must be less than slow_load_threshold_ms ({1})"
    )]
    InvalidThresholds(u64, u64),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Log directory cannot be empty")]
    EmptyLogDir,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .ctxprof/config.yaml (project config)
    /// 3. .ctxprof/local.yaml (local overrides, optional)
    /// 4. Environment variables (CTXPROF_* prefix, `__` separates nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file. Environment variables still
    /// take precedence over the file.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("CTXPROF_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".ctxprof/config.yaml"))
            .merge(Yaml::file(".ctxprof/local.yaml"))
            .merge(Env::prefixed("CTXPROF_").split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogRotation(config.logging.rotation.clone()));
        }

        if config.logging.log_dir.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::EmptyLogDir);
        }

        if config.analysis.top_opportunities == 0 {
            return Err(ConfigError::InvalidTopOpportunities(
                config.analysis.top_opportunities,
            ));
        }

        if config.analysis.opportunity_floor_ms >= config.analysis.slow_load_threshold_ms {
            return Err(ConfigError::InvalidThresholds(
                config.analysis.opportunity_floor_ms,
                config.analysis.slow_load_threshold_ms,
            ));
        }

        Ok(())
    }
}
