//! Exchange adapters
//!
//! Adapters normalize external exchange data to internal events (inbound)
//! and hand alerts to delivery collaborators (outbound).

pub mod alerts;
pub mod binance;

pub use alerts::AlertGateway;
pub use binance::BinanceNormalizer;
