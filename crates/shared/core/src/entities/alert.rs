use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MarketEvent, ThresholdTier};

/// Unique identifier for an alert
pub type AlertId = Uuid;

/// Alert raised when an event crosses a threshold tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    /// Highest tier the event met
    pub tier: ThresholdTier,
    pub event: MarketEvent,
    /// Prior events in the trailing window with the same instrument and
    /// side whose notional also met `tier`
    pub lookback_count: usize,
}

impl Alert {
    pub fn new(tier: ThresholdTier, event: MarketEvent, lookback_count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            tier,
            event,
            lookback_count,
        }
    }

    /// Instrument the alert refers to
    pub fn instrument(&self) -> &str {
        &self.event.instrument
    }
}
