//! The node handle wrapping one election engine.
//!
//! ## Key Responsibilities
//! - Owns the engine and drives its event loop via [`Node::run`]
//! - Exposes the election outcome without locking (`current_leader`,
//!   `subscribe_leader`)
//! - Lets embedding code inject events, e.g. `trigger_leader_lost` when an
//!   external liveness check loses the leader
//!
//! ## Example Usage
//! ```rust,no_run
//! # use tokio::sync::watch;
//! # use bengine::NodeBuilder;
//! # async fn example() {
//! let (_shutdown_tx, shutdown_rx) = watch::channel(());
//! let node = NodeBuilder::new(None, shutdown_rx).build().ready().unwrap();
//! tokio::spawn(async move {
//!     node.run().await.expect("election node execution failed");
//! });
//! # }
//! ```

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::sync::Mutex;

use crate::ElectionEngine;
use crate::ElectionError;
use crate::ElectionEvent;
use crate::NodeConfig;
use crate::PeerId;
use crate::Result;
use crate::TransportError;
use crate::TypeConfig;

pub struct Node<T>
where
    T: TypeConfig,
{
    pub(crate) id: PeerId,
    pub(crate) engine: Arc<Mutex<ElectionEngine<T>>>,

    /// Node-local event injection into the engine loop
    pub event_tx: mpsc::Sender<ElectionEvent>,
    pub(crate) ready: AtomicBool,
    pub(crate) started: AtomicBool,

    pub(crate) leader: Arc<ArcSwapOption<PeerId>>,
    pub(crate) leader_rx: watch::Receiver<Option<PeerId>>,

    pub node_config: Arc<NodeConfig>,
}

impl<T> Node<T>
where
    T: TypeConfig,
{
    pub fn node_id(&self) -> PeerId {
        self.id
    }

    /// Run the election event loop until shutdown.
    ///
    /// The engine is single-run: a second call observes the started flag and
    /// fails without touching the engine.
    pub async fn run(&self) -> Result<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(ElectionError::AlreadyStarted { node_id: self.id }.into());
        }

        self.set_ready(true);

        let mut engine = self.engine.lock().await;
        engine.run().await
    }

    /// Latest decided leader, `None` while undecided or after a revocation.
    pub fn current_leader(&self) -> Option<PeerId> {
        self.leader.load().as_deref().copied()
    }

    /// Watch the leader as it is decided and revoked. The receiver's initial
    /// value reflects the state at subscription time.
    pub fn subscribe_leader(&self) -> watch::Receiver<Option<PeerId>> {
        self.leader_rx.clone()
    }

    /// Inject a leader revocation, e.g. from an external liveness monitor.
    /// The engine re-arms the round if it had decided.
    pub async fn trigger_leader_lost(&self) -> Result<()> {
        self.event_tx
            .send(ElectionEvent::LeaderLost)
            .await
            .map_err(|e| TransportError::SignalSendFailed(e.to_string()))?;
        Ok(())
    }

    pub fn set_ready(
        &self,
        is_ready: bool,
    ) {
        self.ready.store(is_ready, Ordering::SeqCst);
    }

    pub fn server_is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}
