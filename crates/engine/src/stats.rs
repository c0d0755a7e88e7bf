//! Running counters
//!
//! Process-wide, monotonically increasing tallies of what the engine has
//! seen and alerted on. Totals are atomics; per-instrument tallies are
//! sharded in a `DashMap` so workers on different instruments rarely meet.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use liqwatch_core::{Alert, Notional, Side, Symbol, format_amount};
use rust_decimal::Decimal;
use serde::Serialize;

/// Alerts and alerted volume for one instrument
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstrumentTally {
    pub alerts: u64,
    pub volume: Notional,
}

/// Live counters, shared by every worker
pub struct EngineStats {
    started_at: DateTime<Utc>,
    events_seen: AtomicU64,
    events_alerted: AtomicU64,
    events_retained: AtomicU64,
    records_dropped: AtomicU64,
    buy_alerts: AtomicU64,
    sell_alerts: AtomicU64,
    per_instrument: DashMap<Symbol, InstrumentTally>,
}

impl Default for EngineStats {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            events_seen: AtomicU64::new(0),
            events_alerted: AtomicU64::new(0),
            events_retained: AtomicU64::new(0),
            records_dropped: AtomicU64::new(0),
            buy_alerts: AtomicU64::new(0),
            sell_alerts: AtomicU64::new(0),
            per_instrument: DashMap::new(),
        }
    }

    pub fn record_event(&self) {
        self.events_seen.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retained(&self) {
        self.events_retained.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.records_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_alert(&self, alert: &Alert) {
        self.events_alerted.fetch_add(1, Ordering::Relaxed);
        match alert.event.side {
            Side::Buy => self.buy_alerts.fetch_add(1, Ordering::Relaxed),
            Side::Sell => self.sell_alerts.fetch_add(1, Ordering::Relaxed),
        };

        let mut tally = self
            .per_instrument
            .entry(alert.event.instrument.clone())
            .or_default();
        tally.alerts += 1;
        tally.volume = saturating_add(tally.volume, alert.event.notional);
    }

    pub fn events_seen(&self) -> u64 {
        self.events_seen.load(Ordering::Relaxed)
    }

    pub fn events_alerted(&self) -> u64 {
        self.events_alerted.load(Ordering::Relaxed)
    }

    pub fn records_dropped(&self) -> u64 {
        self.records_dropped.load(Ordering::Relaxed)
    }

    pub fn instrument(&self, instrument: &str) -> Option<InstrumentTally> {
        self.per_instrument.get(instrument).map(|t| t.clone())
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> StatsSummary {
        let mut instruments: Vec<(Symbol, InstrumentTally)> = self
            .per_instrument
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        instruments.sort_by(|a, b| {
            b.1.volume
                .cmp(&a.1.volume)
                .then_with(|| a.0.cmp(&b.0))
        });

        let alerted_volume = instruments
            .iter()
            .fold(Decimal::ZERO, |acc, (_, t)| saturating_add(acc, t.volume));

        StatsSummary {
            started_at: self.started_at,
            taken_at: Utc::now(),
            events_seen: self.events_seen(),
            events_alerted: self.events_alerted(),
            events_retained: self.events_retained.load(Ordering::Relaxed),
            records_dropped: self.records_dropped(),
            buy_alerts: self.buy_alerts.load(Ordering::Relaxed),
            sell_alerts: self.sell_alerts.load(Ordering::Relaxed),
            alerted_volume,
            instruments,
        }
    }
}

/// Volumes pin at `Decimal::MAX` instead of overflowing
fn saturating_add(total: Notional, amount: Notional) -> Notional {
    total.checked_add(amount).unwrap_or(Decimal::MAX)
}

/// Snapshot of the running counters, ready for display or serialization
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub started_at: DateTime<Utc>,
    pub taken_at: DateTime<Utc>,
    pub events_seen: u64,
    pub events_alerted: u64,
    pub events_retained: u64,
    pub records_dropped: u64,
    pub buy_alerts: u64,
    pub sell_alerts: u64,
    /// Cumulative notional of alerted events
    pub alerted_volume: Notional,
    /// Sorted by alerted volume, largest first
    pub instruments: Vec<(Symbol, InstrumentTally)>,
}

impl StatsSummary {
    /// Mean notional per alert, zero before the first alert
    pub fn average_alert_size(&self) -> Notional {
        if self.events_alerted == 0 {
            return Decimal::ZERO;
        }
        self.alerted_volume / Decimal::from(self.events_alerted)
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let uptime = self.taken_at - self.started_at;

        writeln!(f, "=== ALERT SUMMARY ===")?;
        writeln!(f, "Uptime: {}s", uptime.num_seconds())?;
        writeln!(f, "Events received: {}", self.events_seen)?;
        writeln!(f, "Events alerted: {}", self.events_alerted)?;
        writeln!(f, "Events retained for lookback: {}", self.events_retained)?;
        writeln!(f, "Records dropped (malformed): {}", self.records_dropped)?;
        writeln!(
            f,
            "Alerted volume: {} USDT",
            format_amount(self.alerted_volume, 2)
        )?;
        writeln!(
            f,
            "Average alert size: {} USDT",
            format_amount(self.average_alert_size(), 2)
        )?;
        writeln!(f, "BUY: {} | SELL: {}", self.buy_alerts, self.sell_alerts)?;

        if !self.instruments.is_empty() {
            writeln!(f, "Top instruments by volume:")?;
            for (symbol, tally) in &self.instruments {
                writeln!(
                    f,
                    "  {:12} | Alerts: {:4} | Volume: {:>14} USDT",
                    symbol,
                    tally.alerts,
                    format_amount(tally.volume, 2)
                )?;
            }
        }

        write!(f, "=== END OF SUMMARY ===")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liqwatch_core::{EventKind, MarketEvent, ThresholdTier};
    use rust_decimal_macros::dec;

    fn alert(instrument: &str, side: Side, notional: Notional) -> Alert {
        let event = MarketEvent::new(
            EventKind::Liquidation,
            instrument,
            Decimal::ONE,
            notional,
            side,
            1,
        )
        .unwrap();
        Alert::new(ThresholdTier::new("10k", dec!(10000)), event, 0)
    }

    #[test]
    fn test_counters() {
        let stats = EngineStats::new();
        stats.record_event();
        stats.record_event();
        stats.record_dropped();
        stats.record_alert(&alert("BTCUSDT", Side::Buy, dec!(60000)));
        stats.record_alert(&alert("BTCUSDT", Side::Sell, dec!(15000.50)));
        stats.record_alert(&alert("ETHUSDT", Side::Sell, dec!(90000)));

        let summary = stats.snapshot();
        assert_eq!(summary.events_seen, 2);
        assert_eq!(summary.records_dropped, 1);
        assert_eq!(summary.events_alerted, 3);
        assert_eq!(summary.buy_alerts, 1);
        assert_eq!(summary.sell_alerts, 2);
        assert_eq!(summary.alerted_volume, dec!(165000.50));
        assert_eq!(summary.average_alert_size().round_dp(2), dec!(55000.17));

        // Sorted by volume
        assert_eq!(summary.instruments[0].0, "ETHUSDT");
        assert_eq!(
            summary.instruments[1].1,
            InstrumentTally {
                alerts: 2,
                volume: dec!(75000.50)
            }
        );
    }

    #[test]
    fn test_volume_saturates_instead_of_overflowing() {
        let stats = EngineStats::new();
        stats.record_alert(&alert("BTCUSDT", Side::Buy, Decimal::MAX));
        stats.record_alert(&alert("BTCUSDT", Side::Buy, Decimal::MAX));
        stats.record_alert(&alert("ETHUSDT", Side::Sell, Decimal::MAX));

        assert_eq!(stats.instrument("BTCUSDT").unwrap().volume, Decimal::MAX);

        let summary = stats.snapshot();
        assert_eq!(summary.events_alerted, 3);
        assert_eq!(summary.alerted_volume, Decimal::MAX);
        assert!(summary.average_alert_size() > Decimal::ZERO);
    }

    #[test]
    fn test_average_without_alerts() {
        assert_eq!(EngineStats::new().snapshot().average_alert_size(), Decimal::ZERO);
    }

    #[test]
    fn test_display() {
        let stats = EngineStats::new();
        stats.record_alert(&alert("BTCUSDT", Side::Buy, dec!(12345.678)));

        let text = stats.snapshot().to_string();
        assert!(text.contains("Events alerted: 1"));
        assert!(text.contains("Alerted volume: 12345.68 USDT"));
        assert!(text.contains("BTCUSDT"));
        assert!(text.ends_with("=== END OF SUMMARY ==="));
    }
}
