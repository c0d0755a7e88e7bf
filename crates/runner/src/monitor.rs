//! Monitor - lifecycle of one monitoring run
//!
//! The ingest loop owns shutdown: it stops at end of input or when the
//! shutdown future resolves, then drains the workers and reports the final
//! summary.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use liqwatch_engine::{AlertEngine, StatsSummary};
use liqwatch_gateway::{
    AlertGateway, AlertMessage, BinanceNormalizer, ChannelPublisher, ChannelSubscriber, Subjects,
    Subscriber,
};
use log::{info, warn};
use tokio::io::AsyncBufRead;

use crate::config::MonitorConfig;
use crate::error::{Result, RunnerError};
use crate::feed::FrameReader;
use crate::router::InstrumentRouter;

pub struct AlertMonitor {
    config: MonitorConfig,
    engine: Arc<AlertEngine>,
    publisher: ChannelPublisher<AlertMessage>,
}

impl AlertMonitor {
    /// Validate the configuration and build the engine
    pub fn new(config: MonitorConfig) -> Result<Self> {
        config.validate()?;

        let normalizer = if config.liquidations_only {
            BinanceNormalizer::liquidations_only()
        } else {
            BinanceNormalizer::new()
        };
        let engine = Arc::new(AlertEngine::new(&config.engine, Box::new(normalizer))?);
        let publisher = ChannelPublisher::new(config.alert_buffer);

        Ok(Self {
            config,
            engine,
            publisher,
        })
    }

    /// Receive every alert published during `run`
    pub fn subscribe(&self) -> ChannelSubscriber<AlertMessage> {
        self.subscribe_to(Subjects::alerts_all())
    }

    /// Receive alerts whose subject matches `pattern`, e.g. `alerts.BTCUSDT`
    pub fn subscribe_to(&self, pattern: &str) -> ChannelSubscriber<AlertMessage> {
        self.publisher.subscribe(pattern)
    }

    pub fn engine(&self) -> &Arc<AlertEngine> {
        &self.engine
    }

    /// Run until end of input or Ctrl-C
    pub async fn run<R>(self, input: R) -> Result<StatsSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        self.run_until(input, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Ctrl-C handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run until end of input or until `shutdown` resolves
    pub async fn run_until<R, F>(self, input: R, shutdown: F) -> Result<StatsSummary>
    where
        R: AsyncBufRead + Unpin,
        F: Future<Output = ()>,
    {
        let AlertMonitor {
            config,
            engine,
            publisher,
        } = self;

        info!(
            "Starting monitor: {} workers, summaries every {}s",
            config.workers, config.summary_interval_secs
        );

        let alert_log = tokio::spawn(log_alerts(publisher.subscribe(Subjects::alerts_all())));
        let gateway = Arc::new(AlertGateway::new(Box::new(publisher.clone())));
        let (router, workers) = InstrumentRouter::spawn(
            Arc::clone(&engine),
            gateway,
            config.workers,
            config.channel_capacity,
        );

        let summaries = (config.summary_interval_secs > 0).then(|| {
            tokio::spawn(run_summaries(
                Arc::clone(&engine),
                Duration::from_secs(config.summary_interval_secs),
            ))
        });

        let mut reader = FrameReader::new(input);
        tokio::pin!(shutdown);

        let ingested: Result<()> = loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break Ok(());
                }
                frame = reader.next_frame() => match frame {
                    Ok(Some(text)) => {
                        let Some(event) = engine.normalize_text(&text) else {
                            continue;
                        };
                        if let Err(e) = router.route(event).await {
                            break Err(e);
                        }
                    }
                    Ok(None) => {
                        info!("End of input after {} frames", reader.frames_read());
                        break Ok(());
                    }
                    Err(e) => break Err(RunnerError::from(e)),
                }
            }
        };

        // Closing the queues lets every worker drain what it already has
        drop(router);
        let mut processed = 0;
        for worker in workers {
            processed += worker
                .await
                .map_err(|e| RunnerError::Worker(e.to_string()))?;
        }

        if let Some(summaries) = summaries {
            summaries.abort();
        }

        // Last publisher handle; the alert log ends once the channel closes
        drop(publisher);
        let logged = alert_log
            .await
            .map_err(|e| RunnerError::Worker(e.to_string()))?;

        ingested?;

        info!("Processed {} events, logged {} alerts", processed, logged);
        let summary = engine.stats().snapshot();
        info!("\n{}", summary);
        Ok(summary)
    }
}

/// Write every alert to the log
async fn log_alerts(mut alerts: ChannelSubscriber<AlertMessage>) -> u64 {
    info!("Alert log subscribed to {}", alerts.pattern());
    let mut logged = 0;

    while let Ok(msg) = alerts.next().await {
        warn!("{}", msg.headline());
        logged += 1;
    }

    if alerts.lagged() > 0 {
        warn!("Alert log fell behind and skipped {} alerts", alerts.lagged());
    }
    logged
}

/// Periodic summary and idle-history sweep
async fn run_summaries(engine: Arc<AlertEngine>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    // First tick fires immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        engine.evict_idle();
        info!("\n{}", engine.stats().snapshot());
    }
}
