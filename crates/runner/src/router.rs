//! Instrument Router
//!
//! Events for one instrument must be processed in arrival order, so every
//! instrument is pinned to one worker by a stable hash. Different
//! instruments run in parallel against the shared engine.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use liqwatch_core::MarketEvent;
use liqwatch_engine::AlertEngine;
use liqwatch_gateway::AlertGateway;
use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{Result, RunnerError};

/// Worker index for an instrument
pub fn shard_for(instrument: &str, workers: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    instrument.hash(&mut hasher);
    (hasher.finish() % workers.max(1) as u64) as usize
}

/// Ingest-side handle; dropping it lets the workers drain and stop
pub struct InstrumentRouter {
    senders: Vec<mpsc::Sender<MarketEvent>>,
}

impl InstrumentRouter {
    /// Spawn `workers` tasks and return the router feeding them
    ///
    /// Each handle resolves to the number of events its worker processed.
    pub fn spawn(
        engine: Arc<AlertEngine>,
        gateway: Arc<AlertGateway>,
        workers: usize,
        capacity: usize,
    ) -> (Self, Vec<JoinHandle<u64>>) {
        let workers = workers.max(1);
        let mut senders = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers);

        for shard in 0..workers {
            let (tx, rx) = mpsc::channel(capacity.max(1));
            senders.push(tx);
            handles.push(tokio::spawn(run_worker(
                shard,
                rx,
                Arc::clone(&engine),
                Arc::clone(&gateway),
            )));
        }

        (Self { senders }, handles)
    }

    pub fn workers(&self) -> usize {
        self.senders.len()
    }

    /// Queue an event on its instrument's worker, waiting if it is full
    pub async fn route(&self, event: MarketEvent) -> Result<()> {
        let shard = shard_for(&event.instrument, self.senders.len());
        self.senders[shard]
            .send(event)
            .await
            .map_err(|_| RunnerError::WorkerGone(shard))
    }
}

async fn run_worker(
    shard: usize,
    mut rx: mpsc::Receiver<MarketEvent>,
    engine: Arc<AlertEngine>,
    gateway: Arc<AlertGateway>,
) -> u64 {
    debug!("Worker {} started", shard);
    let mut processed = 0u64;

    while let Some(event) = rx.recv().await {
        processed += 1;

        let Some(alert) = engine.process(&event) else {
            continue;
        };

        if let Err(e) = gateway.publish_alert(&alert).await {
            warn!("[Worker {}] Alert {} not delivered: {}", shard, alert.id, e);
        }
    }

    info!("Worker {} stopped after {} events", shard, processed);
    processed
}
