//! Alert Engine - the classification pipeline
//!
//! Ties normalizer, threshold table, window store, lookback and emitter
//! together. One call per raw frame; never fails on a single bad event.

use std::sync::Arc;

use liqwatch_core::{Alert, MarketEvent};
use liqwatch_ports::{EventNormalizer, NormalizeError};
use log::{debug, info, trace, warn};
use serde_json::Value;

use crate::config::EngineConfig;
use crate::emitter::AlertEmitter;
use crate::error::Result;
use crate::lookback::LookbackAggregator;
use crate::stats::EngineStats;
use crate::thresholds::ThresholdTable;
use crate::window::SlidingWindowStore;

/// Event classification engine
///
/// `Send + Sync`; share it via `Arc`. Events for one instrument must be
/// fed in arrival order, events for different instruments may be processed
/// concurrently.
pub struct AlertEngine {
    normalizer: Box<dyn EventNormalizer>,
    thresholds: ThresholdTable,
    store: SlidingWindowStore,
    lookback: LookbackAggregator,
    emitter: AlertEmitter,
    stats: Arc<EngineStats>,
}

impl AlertEngine {
    /// Validate `config` and build the engine
    pub fn new(config: &EngineConfig, normalizer: Box<dyn EventNormalizer>) -> Result<Self> {
        let thresholds = config.threshold_table()?;
        let policy = config.retention_policy()?;
        let stats = Arc::new(EngineStats::new());

        info!(
            "Alert engine ready: normalizer={} tiers={} window={}s retention={}ms cap={}",
            normalizer.name(),
            thresholds.len(),
            config.lookback_window_secs,
            policy.retention_ms,
            policy.max_len
        );

        Ok(Self {
            normalizer,
            thresholds,
            store: SlidingWindowStore::new(policy),
            lookback: LookbackAggregator::new(config.lookback_window_secs),
            emitter: AlertEmitter::new(Arc::clone(&stats)),
            stats,
        })
    }

    /// Normalize a decoded frame, counting malformed records
    pub fn normalize(&self, frame: &Value) -> Option<MarketEvent> {
        self.accept(self.normalizer.normalize(frame))
    }

    /// Normalize a text frame, counting malformed records
    pub fn normalize_text(&self, text: &str) -> Option<MarketEvent> {
        self.accept(self.normalizer.normalize_text(text))
    }

    fn accept(
        &self,
        result: std::result::Result<MarketEvent, NormalizeError>,
    ) -> Option<MarketEvent> {
        match result {
            Ok(event) => Some(event),
            Err(NormalizeError::UnrecognizedEnvelope) => {
                trace!("Ignoring unrecognized frame");
                None
            }
            Err(e) => {
                self.stats.record_dropped();
                warn!("Dropping record: {}", e);
                None
            }
        }
    }

    /// Classify one event and update the history
    ///
    /// The lookback is queried before the event is recorded, so an event
    /// never counts itself. Events at or above the retention threshold are
    /// recorded whether or not they raised an alert.
    pub fn process(&self, event: &MarketEvent) -> Option<Alert> {
        self.stats.record_event();

        let alert = self.thresholds.classify(event.notional).map(|tier| {
            let count = self.lookback.count(&self.store, event, tier);
            self.emitter.emit(tier, event, count)
        });

        if self.thresholds.should_retain(event.notional) {
            let stored = self.store.record(
                &event.instrument,
                event.timestamp_ms,
                event.notional,
                event.side,
            );
            if stored {
                self.stats.record_retained();
            }
        } else {
            trace!(
                "{} {} notional {} below retention threshold",
                event.instrument, event.side, event.notional
            );
        }

        alert
    }

    /// Normalize and process a decoded frame
    pub fn handle_frame(&self, frame: &Value) -> Option<Alert> {
        self.normalize(frame).and_then(|event| self.process(&event))
    }

    /// Normalize and process a text frame
    pub fn handle_text(&self, text: &str) -> Option<Alert> {
        self.normalize_text(text).and_then(|event| self.process(&event))
    }

    /// Drop histories that received nothing for one retention horizon
    /// of wall-clock time
    pub fn evict_idle(&self) -> usize {
        let evicted = self.store.evict_idle(self.store.idle_horizon());
        if evicted > 0 {
            debug!("Evicted {} idle instrument histories", evicted);
        }
        evicted
    }

    pub fn stats(&self) -> &Arc<EngineStats> {
        &self.stats
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn store(&self) -> &SlidingWindowStore {
        &self.store
    }

    pub fn lookback(&self) -> &LookbackAggregator {
        &self.lookback
    }
}
