//! Monitor configuration
//!
//! Wraps the engine settings with the runtime knobs of the monitor.
//! Every field has a default, so `{}` is a valid file.

use std::path::Path;

use liqwatch_engine::{ConfigError, EngineConfig};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RunnerError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Tiers and windowing
    #[serde(default)]
    pub engine: EngineConfig,

    /// Worker tasks; each instrument is pinned to one of them
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Bounded queue depth per worker
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Broadcast buffer for alert consumers
    #[serde(default = "default_alert_buffer")]
    pub alert_buffer: usize,

    /// Seconds between summaries and idle sweeps; 0 disables both
    #[serde(default = "default_summary_interval_secs")]
    pub summary_interval_secs: u64,

    /// Ignore `aggTrade` frames
    #[serde(default)]
    pub liquidations_only: bool,
}

fn default_workers() -> usize {
    4
}

fn default_channel_capacity() -> usize {
    1024
}

fn default_alert_buffer() -> usize {
    1024
}

fn default_summary_interval_secs() -> u64 {
    60
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            workers: default_workers(),
            channel_capacity: default_channel_capacity(),
            alert_buffer: default_alert_buffer(),
            summary_interval_secs: default_summary_interval_secs(),
            liquidations_only: false,
        }
    }
}

impl MonitorConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;

        if self.workers == 0 {
            return Err(RunnerError::InvalidSettings(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.channel_capacity == 0 || self.alert_buffer == 0 {
            return Err(RunnerError::InvalidSettings(
                "channel capacities must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = MonitorConfig::from_json("{}").unwrap();
        assert_eq!(config, MonitorConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_engine_settings() {
        let config = MonitorConfig::from_json(
            r#"{
                "workers": 2,
                "summary_interval_secs": 0,
                "liquidations_only": true,
                "engine": {
                    "lookback_window_secs": 120,
                    "tiers": [{"name": "25k", "min_notional": "25000"}]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.workers, 2);
        assert_eq!(config.summary_interval_secs, 0);
        assert!(config.liquidations_only);
        assert_eq!(config.engine.lookback_window_secs, 120);
        assert_eq!(config.engine.tiers[0].min_notional, dec!(25000));
        assert_eq!(config.channel_capacity, 1024);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = MonitorConfig {
            workers: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RunnerError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_engine_errors_surface() {
        let err = MonitorConfig::from_json(r#"{"engine": {"tiers": []}}"#)
            .unwrap()
            .validate()
            .unwrap_err();
        assert!(matches!(err, RunnerError::Config(ConfigError::EmptyTiers)));

        assert!(matches!(
            MonitorConfig::from_json("[").unwrap_err(),
            RunnerError::Config(ConfigError::Parse(_))
        ));
    }
}
