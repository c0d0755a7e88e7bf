//! Alert message type

use liqwatch_core::{Alert, format_amount};
use serde::{Deserialize, Serialize};

/// Decimal places used when rendering notional values
pub const NOTIONAL_DISPLAY_DP: u32 = 2;

/// Display-ready alert record
///
/// Monetary fields are rendered strings so consumers never re-parse them
/// through floating point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub alert_id: String,
    pub tier: String,
    pub instrument: String,
    /// "liquidation" or "trade"
    pub kind: String,
    pub side: String,
    /// Notional with fixed precision, e.g. "60000.00"
    pub notional: String,
    pub quantity: String,
    pub price: String,
    pub timestamp_ms: i64,
    /// UTC event time, e.g. "2024-05-01 12:00:00.250 UTC"
    pub time: String,
    pub lookback_count: usize,
}

impl From<&Alert> for AlertMessage {
    fn from(alert: &Alert) -> Self {
        let event = &alert.event;
        Self {
            alert_id: alert.id.to_string(),
            tier: alert.tier.name.clone(),
            instrument: event.instrument.clone(),
            kind: event.kind.as_str().to_string(),
            side: event.side.as_str().to_string(),
            notional: format_amount(event.notional, NOTIONAL_DISPLAY_DP),
            quantity: event.quantity.normalize().to_string(),
            price: event.price.normalize().to_string(),
            timestamp_ms: event.timestamp_ms,
            time: event.formatted_time(),
            lookback_count: alert.lookback_count,
        }
    }
}

impl AlertMessage {
    /// One-line summary for logs and terminals
    pub fn headline(&self) -> String {
        format!(
            "[{}] {} {:>14} USDT {:<4} {} @ {} x {} | {} | {} in lookback",
            self.tier,
            self.kind,
            self.notional,
            self.side,
            self.instrument,
            self.price,
            self.quantity,
            self.time,
            self.lookback_count
        )
    }
}
