use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::trace;

use super::BusReceiver;
use super::MessageBus;
use crate::RawMessage;
use crate::Result;

/// In-process reference implementation of [`MessageBus`] on one
/// `tokio::sync::broadcast` channel carrying topic-tagged frames.
///
/// Cloning shares the channel, so peers hosted in one process (or one test)
/// form a single broadcast domain. Subscribers that fall behind the channel
/// capacity lose frames, which matches the at-most-once delivery contract.
#[derive(Debug, Clone)]
pub struct BroadcastBus {
    tx: broadcast::Sender<RawMessage>,
}

impl BroadcastBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Number of live subscriptions; used by tests and diagnostics.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[async_trait]
impl MessageBus for BroadcastBus {
    async fn publish(
        &self,
        msg: RawMessage,
    ) -> Result<()> {
        // send only fails with zero receivers; the frame is then lost,
        // which the delivery contract allows
        match self.tx.send(msg) {
            Ok(n) => trace!("bus: frame delivered to {} subscriber(s)", n),
            Err(_) => trace!("bus: frame published with no subscribers"),
        }
        Ok(())
    }

    fn subscribe(&self) -> Result<BusReceiver> {
        Ok(self.tx.subscribe())
    }
}
