use std::sync::Arc;
use std::time::Duration;

use bengine::BroadcastBus;
use bengine::BroadcastTypeConfig;
use bengine::MemRegistry;
use bengine::Node;
use bengine::NodeBuilder;
use bengine::NodeConfig;
use bengine::PeerId;
use bengine::Registry;
use bengine::Result;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;

pub const WAIT_FOR_LEADER_IN_SEC: u64 = 5;

/// One in-process broadcast domain: a shared registry, a shared bus, and the
/// peers started on them.
pub struct TestCluster {
    pub registry: Arc<MemRegistry>,
    pub bus: Arc<BroadcastBus>,
    pub nodes: Vec<Arc<Node<BroadcastTypeConfig>>>,
    graceful_tx: watch::Sender<()>,
    graceful_rx: watch::Receiver<()>,
    handles: Vec<JoinHandle<Result<()>>>,
}

/// Zero every settling window so tests converge on protocol causality alone,
/// not on timers.
pub fn node_config(node_id: PeerId) -> NodeConfig {
    let mut config = NodeConfig::default();
    config.cluster.node_id = node_id;
    config.cluster.prometheus_enabled = false;
    config.election.settle_on_traffic_ms = 0;
    config.election.settle_on_message_ms = 0;
    config.election.settle_on_enter_ms = 0;
    config.election.settle_on_elected_ms = 0;
    config
}

impl TestCluster {
    pub fn new() -> Self {
        let (graceful_tx, graceful_rx) = watch::channel(());
        Self {
            registry: Arc::new(MemRegistry::new()),
            bus: Arc::new(BroadcastBus::new(1024)),
            nodes: Vec::new(),
            graceful_tx,
            graceful_rx,
            handles: Vec::new(),
        }
    }

    /// Open the round and register the full roster up front. Peers started
    /// afterwards find themselves already listed, which removes the
    /// registration/tally race that settling windows paper over in real
    /// deployments.
    pub async fn seed_members(
        &self,
        ids: &[PeerId],
    ) {
        self.registry
            .begin_round(1)
            .await
            .expect("open round on the shared registry");
        for id in ids {
            self.registry.add(*id).await.expect("seed member");
        }
    }

    pub fn start_peer(
        &mut self,
        node_id: PeerId,
    ) -> Arc<Node<BroadcastTypeConfig>> {
        let node = NodeBuilder::from_config(node_config(node_id), self.graceful_rx.clone())
            .registry(self.registry.clone())
            .bus(self.bus.clone())
            .build()
            .ready()
            .expect("peer should be ready");

        let node_clone = node.clone();
        self.handles.push(tokio::spawn(async move { node_clone.run().await }));
        self.nodes.push(node.clone());
        node
    }

    pub async fn shutdown(self) {
        self.graceful_tx.send(()).expect("send shutdown signal");
        for handle in self.handles {
            handle
                .await
                .expect("join peer task")
                .expect("peer should exit cleanly");
        }
    }
}

/// Block until the node observes a decided leader, or panic on timeout.
pub async fn wait_for_leader(node: &Arc<Node<BroadcastTypeConfig>>) -> PeerId {
    let mut leader_rx = node.subscribe_leader();
    time::timeout(Duration::from_secs(WAIT_FOR_LEADER_IN_SEC), async {
        loop {
            if let Some(leader) = *leader_rx.borrow_and_update() {
                return leader;
            }
            leader_rx.changed().await.expect("leader watch stays open");
        }
    })
    .await
    .expect("peer should decide within the timeout")
}
