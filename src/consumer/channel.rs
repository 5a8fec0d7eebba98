//! MPSC channel consumer.

use tokio::sync::mpsc;

use super::{ConsumerError, MetricsConsumer};
use crate::metrics::MetricsDocument;

/// Forwards documents into a bounded channel.
///
/// Backpressure from a full channel delays the tick that is forwarding,
/// which in turn delays the next tick.
#[derive(Debug, Clone)]
pub struct ChannelConsumer {
    tx: mpsc::Sender<MetricsDocument>,
}

impl ChannelConsumer {
    /// Create a consumer and the receiving half of its channel.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<MetricsDocument>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Wrap an existing sender.
    pub fn from_sender(tx: mpsc::Sender<MetricsDocument>) -> Self {
        Self { tx }
    }
}

#[async_trait::async_trait]
impl MetricsConsumer for ChannelConsumer {
    fn name(&self) -> &str {
        "channel"
    }

    async fn consume_metrics(&self, metrics: MetricsDocument) -> Result<(), ConsumerError> {
        self.tx
            .send(metrics)
            .await
            .map_err(|_| ConsumerError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ResourceMetrics;

    #[tokio::test]
    async fn test_channel_consumer_delivers() {
        let (consumer, mut rx) = ChannelConsumer::new(4);
        let doc = MetricsDocument::new(vec![ResourceMetrics::default()]);

        consumer.consume_metrics(doc.clone()).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), doc);
    }

    #[tokio::test]
    async fn test_channel_consumer_closed() {
        let (consumer, rx) = ChannelConsumer::new(1);
        drop(rx);

        let result = consumer.consume_metrics(MetricsDocument::default()).await;
        assert!(matches!(result, Err(ConsumerError::Closed)));
    }
}
