use std::str::FromStr;

use liqwatch_core::{EventKind, MarketEvent, Side, TimestampMs};
use liqwatch_ports::{NormalizeError, NormalizeResult};
use rust_decimal::Decimal;
use serde_json::Value;

/// Parser for one Binance event type
/// Add new parsers without modifying the normalizer's dispatch
pub trait StreamParser: Send + Sync {
    /// Check if this parser handles the given `e` event type
    fn can_parse(&self, event_type: &str) -> bool;

    /// Parse an event payload (already unwrapped from any envelope)
    fn parse(&self, data: &Value) -> NormalizeResult<MarketEvent>;
}

/// Parser for forced liquidation orders (`forceOrder`)
///
/// ```json
/// {"e":"forceOrder","E":1568014460893,
///  "o":{"s":"BTCUSDT","S":"SELL","q":"0.014","p":"9910","T":1568014460893, ...}}
/// ```
pub struct ForceOrderParser;

impl StreamParser for ForceOrderParser {
    fn can_parse(&self, event_type: &str) -> bool {
        event_type == "forceOrder"
    }

    fn parse(&self, data: &Value) -> NormalizeResult<MarketEvent> {
        let order = data
            .get("o")
            .filter(|o| o.is_object())
            .ok_or_else(|| NormalizeError::missing("order"))?;

        let instrument = instrument_field(order.get("s"))?;
        let side = side_field(order.get("S"))?;
        let quantity = decimal_field("quantity", order.get("q"))?;
        let price = decimal_field("price", order.get("p"))?;
        // Order trade time, falling back to the frame's event time
        let timestamp_ms = timestamp_field(order.get("T").or_else(|| data.get("E")))?;

        build_event(
            EventKind::Liquidation,
            instrument,
            quantity,
            price,
            side,
            timestamp_ms,
        )
    }
}

/// Parser for aggregated trades (`aggTrade`)
///
/// There is no side string on this stream: `m` tells whether the buyer was
/// the maker, so the aggressor is SELL when `m` is true and BUY otherwise.
pub struct AggTradeParser;

impl StreamParser for AggTradeParser {
    fn can_parse(&self, event_type: &str) -> bool {
        event_type == "aggTrade"
    }

    fn parse(&self, data: &Value) -> NormalizeResult<MarketEvent> {
        let instrument = instrument_field(data.get("s"))?;
        let side = match data.get("m").and_then(Value::as_bool) {
            Some(true) => Side::Sell,
            Some(false) => Side::Buy,
            None => return Err(NormalizeError::missing("side")),
        };
        let quantity = decimal_field("quantity", data.get("q"))?;
        let price = decimal_field("price", data.get("p"))?;
        let timestamp_ms = timestamp_field(data.get("T").or_else(|| data.get("E")))?;

        build_event(
            EventKind::Trade,
            instrument,
            quantity,
            price,
            side,
            timestamp_ms,
        )
    }
}

fn build_event(
    kind: EventKind,
    instrument: String,
    quantity: Decimal,
    price: Decimal,
    side: Side,
    timestamp_ms: TimestampMs,
) -> NormalizeResult<MarketEvent> {
    MarketEvent::new(kind, instrument, quantity, price, side, timestamp_ms)
        .ok_or_else(|| NormalizeError::malformed("notional", "quantity * price overflows"))
}

fn instrument_field(value: Option<&Value>) -> NormalizeResult<String> {
    match value.and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        Some(_) => Err(NormalizeError::malformed("instrument", "empty")),
        None => Err(NormalizeError::missing("instrument")),
    }
}

fn side_field(value: Option<&Value>) -> NormalizeResult<Side> {
    let raw = value
        .and_then(Value::as_str)
        .ok_or_else(|| NormalizeError::missing("side"))?;
    Side::from_str(raw).map_err(|e| NormalizeError::malformed("side", e.to_string()))
}

/// Exact decimal from a JSON string (Binance's encoding) or number.
/// Numbers go through their textual form so no float rounding creeps in.
fn decimal_field(field: &'static str, value: Option<&Value>) -> NormalizeResult<Decimal> {
    let parsed = match value {
        Some(Value::String(s)) => Decimal::from_str(s.trim()),
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string()),
        Some(other) => {
            return Err(NormalizeError::malformed(
                field,
                format!("expected decimal, got {}", other),
            ));
        }
        None => return Err(NormalizeError::missing(field)),
    };

    let amount = parsed.map_err(|e| NormalizeError::malformed(field, e.to_string()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(NormalizeError::malformed(field, "negative"));
    }
    Ok(amount)
}

fn timestamp_field(value: Option<&Value>) -> NormalizeResult<TimestampMs> {
    let ts = value
        .and_then(Value::as_i64)
        .ok_or_else(|| NormalizeError::missing("event_time"))?;
    if ts <= 0 {
        return Err(NormalizeError::malformed(
            "event_time",
            format!("non-positive timestamp {}", ts),
        ));
    }
    Ok(ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn force_order() -> Value {
        json!({
            "e": "forceOrder",
            "E": 1568014460893i64,
            "o": {
                "s": "BTCUSDT",
                "S": "SELL",
                "o": "LIMIT",
                "f": "IOC",
                "q": "0.014",
                "p": "9910",
                "ap": "9910",
                "X": "FILLED",
                "l": "0.014",
                "z": "0.014",
                "T": 1568014460893i64
            }
        })
    }

    #[test]
    fn test_force_order_parser() {
        let parser = ForceOrderParser;
        assert!(parser.can_parse("forceOrder"));
        assert!(!parser.can_parse("aggTrade"));

        let event = parser.parse(&force_order()).unwrap();
        assert_eq!(event.kind, EventKind::Liquidation);
        assert_eq!(event.instrument, "BTCUSDT");
        assert_eq!(event.side, Side::Sell);
        assert_eq!(event.quantity, dec!(0.014));
        assert_eq!(event.price, dec!(9910));
        assert_eq!(event.notional, dec!(138.74));
        assert_eq!(event.timestamp_ms, 1568014460893);
    }

    #[test]
    fn test_force_order_falls_back_to_event_time() {
        let mut frame = force_order();
        frame["o"].as_object_mut().unwrap().remove("T");
        frame["E"] = json!(42);

        let event = ForceOrderParser.parse(&frame).unwrap();
        assert_eq!(event.timestamp_ms, 42);
    }

    #[test]
    fn test_force_order_lowercase_side() {
        let mut frame = force_order();
        frame["o"]["S"] = json!("buy");

        let event = ForceOrderParser.parse(&frame).unwrap();
        assert_eq!(event.side, Side::Buy);
    }

    #[test]
    fn test_force_order_malformed_fields() {
        let cases = [
            ("q", json!("abc"), "quantity"),
            ("q", json!(""), "quantity"),
            ("p", json!("-1"), "price"),
            ("S", json!("LONG"), "side"),
            ("s", json!(""), "instrument"),
            ("T", json!(0), "event_time"),
        ];

        for (key, bad, expected_field) in cases {
            let mut frame = force_order();
            frame["o"][key] = bad;
            match ForceOrderParser.parse(&frame) {
                Err(NormalizeError::MalformedRecord { field, .. }) => {
                    assert_eq!(field, expected_field, "key {}", key)
                }
                other => panic!(
                    "expected malformed {} for {}, got {:?}",
                    expected_field, key, other
                ),
            }
        }
    }

    #[test]
    fn test_force_order_missing_order_object() {
        let frame = json!({"e": "forceOrder", "E": 1});
        let err = ForceOrderParser.parse(&frame).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_agg_trade_parser() {
        let parser = AggTradeParser;
        assert!(parser.can_parse("aggTrade"));

        let data = json!({
            "e": "aggTrade",
            "E": 123456789,
            "s": "ETHUSDT",
            "a": 5933014,
            "p": "3000.50",
            "q": "10",
            "f": 100,
            "l": 105,
            "T": 123456785,
            "m": true
        });

        let event = parser.parse(&data).unwrap();
        assert_eq!(event.kind, EventKind::Trade);
        assert_eq!(event.instrument, "ETHUSDT");
        // Buyer was maker, so the aggressor sold
        assert_eq!(event.side, Side::Sell);
        assert_eq!(event.notional, dec!(30005.00));
        assert_eq!(event.timestamp_ms, 123456785);
    }

    #[test]
    fn test_agg_trade_buyer_aggressor_and_numeric_amounts() {
        let data = json!({
            "e": "aggTrade",
            "s": "ETHUSDT",
            "p": 2500.5,
            "q": 2,
            "T": 10,
            "m": false
        });

        let event = AggTradeParser.parse(&data).unwrap();
        assert_eq!(event.side, Side::Buy);
        assert_eq!(event.notional, dec!(5001.0));
    }

    #[test]
    fn test_agg_trade_missing_maker_flag() {
        let data = json!({"e": "aggTrade", "s": "ETHUSDT", "p": "1", "q": "1", "T": 10});
        match AggTradeParser.parse(&data) {
            Err(NormalizeError::MalformedRecord { field, .. }) => assert_eq!(field, "side"),
            other => panic!("expected malformed side, got {:?}", other),
        }
    }
}
