//! Alert transport
//!
//! Alerts are published on subjects (`alerts.{instrument}`) and consumers
//! subscribe with a subject pattern. The in-process implementation is a
//! tokio broadcast channel; anything implementing these traits can take
//! its place behind `AlertGateway`.

pub mod channel;
pub mod config;

pub use config::Subjects;

use crate::error::TransportError;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// Sends messages on a subject
#[async_trait]
pub trait Publisher<M>: Send + Sync
where
    M: Serialize + Send + Sync,
{
    async fn publish_to(&self, subject: &str, msg: &M) -> Result<(), TransportError>;
}

/// Receives the messages whose subject matches its pattern
#[async_trait]
pub trait Subscriber<M>: Send
where
    M: DeserializeOwned + Send,
{
    /// Wait for the next matching message
    async fn next(&mut self) -> Result<M, TransportError>;

    /// Next matching message if one is already buffered
    fn try_next(&mut self) -> Result<Option<M>, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both traits are used as trait objects
    fn _publisher_is_object_safe(_: &dyn Publisher<String>) {}
    fn _subscriber_is_object_safe(_: &mut dyn Subscriber<String>) {}
}
