use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Side;
use crate::values::{Notional, Price, Quantity, Symbol, TimestampMs, notional};

/// Which exchange stream produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Forced liquidation order
    Liquidation,
    /// Aggregated trade print
    Trade,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Liquidation => "liquidation",
            EventKind::Trade => "trade",
        }
    }
}

/// Canonical market event, one per processed exchange message
///
/// The notional is derived from quantity and price in `new`, never supplied
/// by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketEvent {
    pub kind: EventKind,
    pub instrument: Symbol,
    pub quantity: Quantity,
    pub price: Price,
    /// quantity * price
    pub notional: Notional,
    pub side: Side,
    pub timestamp_ms: TimestampMs,
}

impl MarketEvent {
    /// Create an event, deriving its notional.
    ///
    /// `None` when `quantity * price` does not fit in a `Decimal`.
    pub fn new(
        kind: EventKind,
        instrument: impl Into<Symbol>,
        quantity: Quantity,
        price: Price,
        side: Side,
        timestamp_ms: TimestampMs,
    ) -> Option<Self> {
        Some(Self {
            kind,
            instrument: instrument.into(),
            quantity,
            price,
            notional: notional(quantity, price)?,
            side,
            timestamp_ms,
        })
    }

    /// Event time as a UTC datetime, `None` if the timestamp is out of range
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }

    /// Human-readable UTC event time, e.g. `2024-05-01 12:00:00.250 UTC`
    pub fn formatted_time(&self) -> String {
        match self.time() {
            Some(t) => t.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string(),
            None => format!("{}ms", self.timestamp_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn event(ts: TimestampMs) -> MarketEvent {
        MarketEvent::new(
            EventKind::Liquidation,
            "BTCUSDT",
            dec!(2),
            dec!(30000),
            Side::Sell,
            ts,
        )
        .unwrap()
    }

    #[test]
    fn test_notional_is_derived() {
        assert_eq!(event(1).notional, dec!(60000));

        let overflow = MarketEvent::new(
            EventKind::Trade,
            "BTCUSDT",
            rust_decimal::Decimal::MAX,
            dec!(2),
            Side::Buy,
            1,
        );
        assert!(overflow.is_none());
    }

    #[test]
    fn test_formatted_time() {
        let e = event(1_714_564_800_250);
        assert_eq!(e.formatted_time(), "2024-05-01 12:00:00.250 UTC");
    }

    #[test]
    fn test_serializes_side_uppercase() {
        let json = serde_json::to_value(event(1)).unwrap();
        assert_eq!(json["side"], "SELL");
        assert_eq!(json["instrument"], "BTCUSDT");
    }
}
