//! liqwatch Engine
//!
//! Event classification and sliding-window lookback for liquidation and
//! large-trade monitoring:
//!
//! - **Threshold Table**: named notional tiers, highest match wins
//! - **Sliding Window Store**: per-instrument bounded history (count + age)
//! - **Lookback Aggregator**: same instrument, same side, ≥ tier, in window
//! - **Alert Emitter**: one alert per qualifying event
//! - **Stats**: process-wide running counters and summaries
//!
//! ## Pipeline
//!
//! ```text
//! raw frame ──► normalize ──► classify tier ──► lookback query ──► emit alert
//!                                                                      │
//!                        store.record (if ≥ retention threshold) ◄─────┘
//! ```
//!
//! Querying before recording guarantees an event never counts itself.

pub mod config;
pub mod emitter;
pub mod engine;
pub mod error;
pub mod lookback;
pub mod stats;
pub mod thresholds;
pub mod window;

// Re-export main types
pub use config::{EngineConfig, TierConfig};
pub use emitter::AlertEmitter;
pub use engine::AlertEngine;
pub use error::{ConfigError, Result};
pub use lookback::LookbackAggregator;
pub use stats::{EngineStats, InstrumentTally, StatsSummary};
pub use thresholds::ThresholdTable;
pub use window::{RetentionPolicy, SlidingWindowStore, WindowEntry};
