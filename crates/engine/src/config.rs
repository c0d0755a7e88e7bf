//! Engine configuration
//!
//! Loaded once at startup from JSON and validated into runtime types.
//! Example:
//!
//! ```json
//! {
//!   "lookback_window_secs": 60,
//!   "prune_factor": "1.5",
//!   "max_history_len": 1000,
//!   "tiers": [
//!     {"name": "10k", "min_notional": "10000"},
//!     {"name": "50k", "min_notional": "50000"}
//!   ]
//! }
//! ```

use std::path::Path;

use liqwatch_core::ThresholdTier;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::thresholds::ThresholdTable;
use crate::window::RetentionPolicy;

/// One configured tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    pub name: String,
    pub min_notional: Decimal,
}

impl TierConfig {
    pub fn new(name: impl Into<String>, min_notional: Decimal) -> Self {
        Self {
            name: name.into(),
            min_notional,
        }
    }
}

/// Classification and windowing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Trailing lookback window
    #[serde(default = "default_lookback_window_secs")]
    pub lookback_window_secs: u64,

    /// Histories keep `lookback_window_secs * prune_factor` of data so
    /// entries right at the window edge are still around to be counted
    #[serde(default = "default_prune_factor")]
    pub prune_factor: Decimal,

    /// Hard cap on retained entries per instrument
    #[serde(default = "default_max_history_len")]
    pub max_history_len: usize,

    /// Tiers, strictly ascending or strictly descending by minimum
    #[serde(default = "default_tiers")]
    pub tiers: Vec<TierConfig>,
}

fn default_lookback_window_secs() -> u64 {
    60
}

fn default_prune_factor() -> Decimal {
    dec!(1.5)
}

fn default_max_history_len() -> usize {
    1000
}

fn default_tiers() -> Vec<TierConfig> {
    vec![
        TierConfig::new("10k", dec!(10000)),
        TierConfig::new("50k", dec!(50000)),
        TierConfig::new("100k", dec!(100000)),
        TierConfig::new("500k", dec!(500000)),
        TierConfig::new("1M", dec!(1000000)),
    ]
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookback_window_secs: default_lookback_window_secs(),
            prune_factor: default_prune_factor(),
            max_history_len: default_max_history_len(),
            tiers: default_tiers(),
        }
    }
}

impl EngineConfig {
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
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Builder-style tier override
    pub fn with_tiers(mut self, tiers: Vec<TierConfig>) -> Self {
        self.tiers = tiers;
        self
    }

    /// Check everything the engine depends on
    pub fn validate(&self) -> Result<()> {
        self.threshold_table()?;
        self.retention_policy()?;
        Ok(())
    }

    pub fn threshold_table(&self) -> Result<ThresholdTable> {
        ThresholdTable::new(
            self.tiers
                .iter()
                .map(|t| ThresholdTier::new(t.name.clone(), t.min_notional))
                .collect(),
        )
    }

    pub fn retention_policy(&self) -> Result<RetentionPolicy> {
        if self.lookback_window_secs == 0 {
            return Err(ConfigError::InvalidWindow(
                "lookback_window_secs must be positive".to_string(),
            ));
        }
        if self.prune_factor < Decimal::ONE {
            return Err(ConfigError::InvalidWindow(format!(
                "prune_factor {} must be at least 1",
                self.prune_factor
            )));
        }
        if self.max_history_len == 0 {
            return Err(ConfigError::InvalidWindow(
                "max_history_len must be positive".to_string(),
            ));
        }

        let retention_ms = Decimal::from(self.lookback_window_secs)
            .checked_mul(dec!(1000))
            .and_then(|ms| ms.checked_mul(self.prune_factor))
            .and_then(|ms| ms.floor().to_i64())
            .ok_or_else(|| {
                ConfigError::InvalidWindow("retention horizon overflows".to_string())
            })?;

        Ok(RetentionPolicy {
            retention_ms,
            max_len: self.max_history_len,
        })
    }
}
