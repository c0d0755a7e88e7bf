//! Alert Gateway - hands alerts to delivery collaborators
//!
//! Converts engine alerts to the display-ready wire format and publishes
//! them on `alerts.{instrument}` for log writers, dashboards, etc.

use crate::error::GatewayError;
use crate::messages::AlertMessage;
use crate::transport::Publisher;
use crate::transport::config::Subjects;
use liqwatch_core::Alert;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};

/// Outbound gateway for alerts
pub struct AlertGateway {
    publisher: Box<dyn Publisher<AlertMessage> + Send + Sync>,
    /// Alerts successfully handed off
    published: AtomicU64,
}

impl AlertGateway {
    pub fn new(publisher: Box<dyn Publisher<AlertMessage> + Send + Sync>) -> Self {
        Self {
            publisher,
            published: AtomicU64::new(0),
        }
    }

    /// Publish an alert
    pub async fn publish_alert(&self, alert: &Alert) -> Result<AlertMessage, GatewayError> {
        let msg = AlertMessage::from(alert);
        let subject = Subjects::alerts(&msg.instrument);

        debug!("Publishing alert {} on subject {}", msg.alert_id, subject);

        self.publisher
            .publish_to(&subject, &msg)
            .await
            .map_err(GatewayError::Transport)?;

        self.published.fetch_add(1, Ordering::Relaxed);
        Ok(msg)
    }

    /// Number of alerts published so far
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}
