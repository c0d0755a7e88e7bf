//! Binance USDⓈ-M futures adapter
//!
//! Understands the `forceOrder` (liquidation) and `aggTrade` streams, both
//! as raw stream frames and wrapped in the combined-stream envelope
//! `{"stream": "...", "data": {...}}`.

mod normalizer;
mod parsers;

pub use normalizer::BinanceNormalizer;
pub use parsers::{AggTradeParser, ForceOrderParser, StreamParser};
