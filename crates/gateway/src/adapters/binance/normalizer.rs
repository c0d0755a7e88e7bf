use liqwatch_core::MarketEvent;
use liqwatch_ports::{EventNormalizer, NormalizeError, NormalizeResult};
use log::trace;
use serde_json::Value;

use super::parsers::{AggTradeParser, ForceOrderParser, StreamParser};

/// Normalizer for Binance USDⓈ-M futures frames
///
/// Unwraps the combined-stream envelope, reads the `e` event type and
/// dispatches to the first parser that accepts it. Frames without a
/// recognizable event type are `UnrecognizedEnvelope`.
pub struct BinanceNormalizer {
    parsers: Vec<Box<dyn StreamParser>>,
}

impl Default for BinanceNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl BinanceNormalizer {
    /// Normalizer for both liquidations and aggregated trades
    pub fn new() -> Self {
        Self::with_parsers(vec![Box::new(ForceOrderParser), Box::new(AggTradeParser)])
    }

    /// Liquidation stream only (`!forceOrder@arr`)
    pub fn liquidations_only() -> Self {
        Self::with_parsers(vec![Box::new(ForceOrderParser)])
    }

    pub fn with_parsers(parsers: Vec<Box<dyn StreamParser>>) -> Self {
        Self { parsers }
    }

    /// Strip `{"stream": ..., "data": {...}}` if present
    fn payload(frame: &Value) -> &Value {
        match (frame.get("stream"), frame.get("data")) {
            (Some(_), Some(data)) => data,
            _ => frame,
        }
    }
}

impl EventNormalizer for BinanceNormalizer {
    fn normalize(&self, frame: &Value) -> NormalizeResult<MarketEvent> {
        let data = Self::payload(frame);

        let event_type = data
            .get("e")
            .and_then(Value::as_str)
            .ok_or(NormalizeError::UnrecognizedEnvelope)?;

        let parser = self
            .parsers
            .iter()
            .find(|p| p.can_parse(event_type))
            .ok_or(NormalizeError::UnrecognizedEnvelope)?;

        trace!("Parsing {} frame", event_type);
        parser.parse(data)
    }

    fn name(&self) -> &str {
        "binance-futures"
    }
}
