//! Lookback Aggregator
//!
//! Counts prior events for the same instrument and side whose notional met
//! the triggering event's tier, within `(ts - window, ts]`. Must run before
//! the triggering event is recorded.

use liqwatch_core::{MarketEvent, ThresholdTier, TimestampMs};

use crate::window::SlidingWindowStore;

#[derive(Debug, Clone, Copy)]
pub struct LookbackAggregator {
    window_ms: i64,
}

impl LookbackAggregator {
    pub fn new(lookback_window_secs: u64) -> Self {
        let window_ms = lookback_window_secs.saturating_mul(1000);
        Self {
            window_ms: i64::try_from(window_ms).unwrap_or(i64::MAX),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window_ms
    }

    /// Exclusive lower bound of the trailing window
    pub fn window_start(&self, event: &MarketEvent) -> TimestampMs {
        event.timestamp_ms.saturating_sub(self.window_ms)
    }

    /// Matching prior events: same side, notional ≥ tier minimum
    pub fn count(
        &self,
        store: &SlidingWindowStore,
        event: &MarketEvent,
        tier: &ThresholdTier,
    ) -> usize {
        store
            .query_through(
                &event.instrument,
                event.timestamp_ms,
                self.window_start(event),
            )
            .iter()
            .filter(|entry| entry.side == event.side && tier.is_met_by(entry.notional))
            .count()
    }
}
