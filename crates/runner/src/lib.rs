//! liqwatch Runner - Liquidation and large-trade monitor
//!
//! Orchestrates the monitor around the classification engine:
//!
//! - **Frame Feed**: line-delimited JSON frames from stdin or a capture file
//! - **Router**: pins each instrument to one worker so its events stay ordered
//! - **Workers**: run the engine and publish alerts through the gateway
//! - **Monitor**: lifecycle, alert log, periodic summaries, idle sweeps
//!
//! ## Architecture
//!
//! ```text
//!               ┌─────────────────┐
//!               │   Frame Feed    │  one JSON frame per line
//!               └────────┬────────┘
//!                        │ normalize (ingest task)
//!                        ▼
//!               ┌─────────────────┐
//!               │     Router      │  hash(instrument) % workers
//!               └──┬──────┬────┬──┘
//!                  │      │    │  mpsc
//!                  ▼      ▼    ▼
//! ┌─────────────────────────────────────────┐
//! │                WORKERS                  │
//! │   AlertEngine::process (shared, Arc)    │
//! └───────────────────┬─────────────────────┘
//!                     │ Alert
//!                     ▼
//!          ┌───────────────────────┐
//!          │     Alert Gateway     │  alerts.{instrument}
//!          └───────────┬───────────┘
//!                      ▼
//!          ┌───────────────────────┐
//!          │  Alert log / consumers│
//!          └───────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod monitor;
pub mod router;

// Re-export main types
pub use config::MonitorConfig;
pub use error::{Result, RunnerError};
pub use feed::FrameReader;
pub use monitor::AlertMonitor;
pub use router::{InstrumentRouter, shard_for};
