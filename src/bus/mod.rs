//! Messaging bus abstraction.
//!
//! The bus is a publish/subscribe transport over the three election topics.
//! Delivery is broadcast, at-most-once per send, with no ordering guarantee
//! across topics or senders. A publisher that is also subscribed receives
//! its own frames.

mod broadcast_bus;
pub use broadcast_bus::*;


use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::sync::broadcast;

use crate::RawMessage;
use crate::Result;

/// Receiving end of a bus subscription. Every subscriber sees every frame
/// published after it subscribed, subject to at-most-once delivery.
pub type BusReceiver = broadcast::Receiver<RawMessage>;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageBus: Send + Sync + 'static {
    /// Broadcast one topic-tagged frame to all current subscribers.
    ///
    /// Publishing with zero subscribers is not an error: the frame is simply
    /// lost, consistent with at-most-once delivery.
    async fn publish(
        &self,
        msg: RawMessage,
    ) -> Result<()>;

    /// Open a subscription covering all three topics.
    fn subscribe(&self) -> Result<BusReceiver>;
}
