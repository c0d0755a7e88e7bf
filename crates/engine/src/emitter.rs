//! Alert Emitter

use std::sync::Arc;

use liqwatch_core::{Alert, MarketEvent, ThresholdTier};
use log::debug;

use crate::stats::EngineStats;

/// Builds alerts and keeps the running counters in step with them
pub struct AlertEmitter {
    stats: Arc<EngineStats>,
}

impl AlertEmitter {
    pub fn new(stats: Arc<EngineStats>) -> Self {
        Self { stats }
    }

    pub fn emit(&self, tier: &ThresholdTier, event: &MarketEvent, lookback_count: usize) -> Alert {
        let alert = Alert::new(tier.clone(), event.clone(), lookback_count);
        self.stats.record_alert(&alert);

        debug!(
            "[{}] {} {} {} notional={} lookback={}",
            tier.name,
            event.kind.as_str(),
            event.side,
            event.instrument,
            event.notional,
            lookback_count
        );
        alert
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liqwatch_core::{EventKind, Side};
    use rust_decimal_macros::dec;

    #[test]
    fn test_emit_updates_stats() {
        let stats = Arc::new(EngineStats::new());
        let emitter = AlertEmitter::new(Arc::clone(&stats));
        let event = MarketEvent::new(
            EventKind::Trade,
            "SOLUSDT",
            dec!(500),
            dec!(150),
            Side::Sell,
            1_000,
        )
        .unwrap();
        let tier = ThresholdTier::new("50k", dec!(50000));

        let alert = emitter.emit(&tier, &event, 4);

        assert_eq!(alert.tier, tier);
        assert_eq!(alert.event, event);
        assert_eq!(alert.lookback_count, 4);
        assert_eq!(stats.events_alerted(), 1);
        assert_eq!(stats.instrument("SOLUSDT").unwrap().volume, dec!(75000));
    }
}
