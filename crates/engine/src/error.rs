//! Engine errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Invalid startup configuration. The engine refuses to run with any of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("At least one threshold tier is required")]
    EmptyTiers,

    #[error("Tier name must not be empty")]
    EmptyTierName,

    #[error("Duplicate tier name: {0}")]
    DuplicateTierName(String),

    #[error("Tiers '{first}' and '{second}' share the same minimum notional {min_notional}")]
    DuplicateThreshold {
        first: String,
        second: String,
        min_notional: Decimal,
    },

    #[error("Tier thresholds must be strictly ordered; '{name}' ({min_notional}) breaks the order")]
    NonMonotonic { name: String, min_notional: Decimal },

    #[error("Tier '{name}' has negative minimum notional {min_notional}")]
    NegativeThreshold { name: String, min_notional: Decimal },

    #[error("Invalid window settings: {0}")]
    InvalidWindow(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
