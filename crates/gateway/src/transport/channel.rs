//! Tokio broadcast transport for single-process mode
//!
//! Every subscriber (log writer, dashboard socket bridge) gets its own copy
//! of each message whose subject matches its pattern. Messages are passed
//! directly, with no serialization.

use crate::error::TransportError;
use crate::transport::config::Subjects;
use crate::transport::{Publisher, Subscriber};
use async_trait::async_trait;
use log::{trace, warn};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::broadcast;

/// A message with the subject it was published on
#[derive(Debug, Clone)]
struct Routed<M> {
    subject: String,
    msg: M,
}

#[derive(Clone)]
pub struct ChannelPublisher<M> {
    tx: broadcast::Sender<Routed<M>>,
}

impl<M: Clone> ChannelPublisher<M> {
    /// Publisher with room for `capacity` unread messages per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to subjects matching `pattern` (`alerts.BTCUSDT`, `alerts.*`)
    pub fn subscribe(&self, pattern: &str) -> ChannelSubscriber<M> {
        ChannelSubscriber {
            rx: self.tx.subscribe(),
            pattern: pattern.to_string(),
            lagged: 0,
        }
    }
}

#[async_trait]
impl<M> Publisher<M> for ChannelPublisher<M>
where
    M: Serialize + Clone + Send + Sync + 'static,
{
    async fn publish_to(&self, subject: &str, msg: &M) -> Result<(), TransportError> {
        // Fails only when nobody is subscribed at all
        let receivers = self
            .tx
            .send(Routed {
                subject: subject.to_string(),
                msg: msg.clone(),
            })
            .map_err(|_| TransportError::ChannelClosed)?;
        trace!("Published on {} to {} receivers", subject, receivers);
        Ok(())
    }
}

/// Broadcast receiver filtered by subject pattern
///
/// A slow consumer skips what it missed instead of stalling publishers; the
/// number of skipped messages is kept in `lagged`.
pub struct ChannelSubscriber<M> {
    rx: broadcast::Receiver<Routed<M>>,
    pattern: String,
    lagged: u64,
}

impl<M> ChannelSubscriber<M> {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Messages skipped because this subscriber fell behind
    pub fn lagged(&self) -> u64 {
        self.lagged
    }

    fn accept(&self, routed: Routed<M>) -> Option<M> {
        Subjects::matches(&self.pattern, &routed.subject).then_some(routed.msg)
    }
}

#[async_trait]
impl<M> Subscriber<M> for ChannelSubscriber<M>
where
    M: DeserializeOwned + Clone + Send + 'static,
{
    async fn next(&mut self) -> Result<M, TransportError> {
        loop {
            match self.rx.recv().await {
                Ok(routed) => {
                    if let Some(msg) = self.accept(routed) {
                        return Ok(msg);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Subscriber {} lagged, skipped {} messages", self.pattern, skipped);
                    self.lagged += skipped;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(TransportError::ChannelClosed);
                }
            }
        }
    }

    fn try_next(&mut self) -> Result<Option<M>, TransportError> {
        loop {
            match self.rx.try_recv() {
                Ok(routed) => {
                    if let Some(msg) = self.accept(routed) {
                        return Ok(Some(msg));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    self.lagged += skipped;
                }
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(TransportError::ChannelClosed);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pubsub() {
        let publisher = ChannelPublisher::<String>::new(10);
        let mut subscriber = publisher.subscribe("alerts.*");

        publisher
            .publish_to("alerts.BTCUSDT", &"alert".to_string())
            .await
            .unwrap();

        assert_eq!(subscriber.next().await.unwrap(), "alert");
        assert_eq!(subscriber.try_next().unwrap(), None);
    }

    #[tokio::test]
    async fn test_subscribers_only_see_their_subjects() {
        let publisher = ChannelPublisher::<u32>::new(10);
        let mut all = publisher.subscribe(Subjects::alerts_all());
        let mut btc = publisher.subscribe(&Subjects::alerts("BTCUSDT"));

        publisher.publish_to("alerts.ETHUSDT", &1).await.unwrap();
        publisher.publish_to("alerts.BTCUSDT", &2).await.unwrap();

        assert_eq!(all.try_next().unwrap(), Some(1));
        assert_eq!(all.try_next().unwrap(), Some(2));
        assert_eq!(btc.next().await.unwrap(), 2);
        assert_eq!(btc.try_next().unwrap(), None);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_fails() {
        let publisher = ChannelPublisher::<u32>::new(10);
        drop(publisher.subscribe("alerts.*"));

        let result = publisher.publish_to("alerts.BTCUSDT", &1).await;
        assert!(matches!(result, Err(TransportError::ChannelClosed)));
    }

    #[tokio::test]
    async fn test_slow_subscriber_skips_and_counts() {
        let publisher = ChannelPublisher::<u32>::new(2);
        let mut subscriber = publisher.subscribe("alerts.*");

        for i in 0..5 {
            publisher.publish_to("alerts.BTCUSDT", &i).await.unwrap();
        }

        // Capacity 2: the three oldest are gone
        assert_eq!(subscriber.try_next().unwrap(), Some(3));
        assert_eq!(subscriber.lagged(), 3);
        assert_eq!(subscriber.next().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_closed_channel_ends_subscriber() {
        let publisher = ChannelPublisher::<u32>::new(4);
        let mut subscriber = publisher.subscribe("alerts.*");
        publisher.publish_to("alerts.BTCUSDT", &9).await.unwrap();
        drop(publisher);

        assert_eq!(subscriber.next().await.unwrap(), 9);
        assert!(matches!(
            subscriber.next().await,
            Err(TransportError::ChannelClosed)
        ));
    }
}
