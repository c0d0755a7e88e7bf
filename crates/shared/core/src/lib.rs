//! liqwatch Core Domain
//!
//! Pure domain types for the liqwatch monitor: market events, threshold
//! tiers, alerts and the exact-decimal monetary helpers they rely on.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    Alert, AlertId, EventKind, MarketEvent, Side, ThresholdTier, UnknownSide,
};
pub use values::{Notional, Price, Quantity, Symbol, TimestampMs, format_amount, notional};
