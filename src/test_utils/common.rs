use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio::sync::mpsc;
use tokio::sync::watch;

use crate::ElectionEngine;
use crate::ElectionEvent;
use super::MockTypeConfig;
use crate::MockMessageBus;
use crate::MockRegistry;
use crate::NodeConfig;
use crate::PeerId;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    env_logger::init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
    println!("setup logger for unit test.");
}

/// Defaults with every settling window zeroed so unit tests never sleep.
pub(crate) fn zero_settle_config() -> NodeConfig {
    let mut config = NodeConfig::default();
    config.election.settle_on_traffic_ms = 0;
    config.election.settle_on_message_ms = 0;
    config.election.settle_on_enter_ms = 0;
    config.election.settle_on_elected_ms = 0;
    config
}

pub(crate) struct MockEngineContext {
    pub engine: ElectionEngine<MockTypeConfig>,
    pub event_tx: mpsc::Sender<ElectionEvent>,
    pub leader: Arc<ArcSwapOption<PeerId>>,
    pub leader_rx: watch::Receiver<Option<PeerId>>,
    pub shutdown_tx: watch::Sender<()>,
}

/// Assemble an engine over mocked seams; expectations are configured on the
/// mocks by the caller before this is invoked.
pub(crate) fn mock_engine_context(
    node_id: PeerId,
    registry: MockRegistry,
    bus: MockMessageBus,
) -> MockEngineContext {
    let config = Arc::new(zero_settle_config());
    let leader = Arc::new(ArcSwapOption::from(None));
    let (leader_tx, leader_rx) = watch::channel(None);
    let (event_tx, event_rx) = mpsc::channel(config.election.event_channel_capacity);
    let (shutdown_tx, shutdown_rx) = watch::channel(());

    let engine = ElectionEngine::<MockTypeConfig>::new(
        node_id,
        Arc::new(registry),
        Arc::new(bus),
        config,
        leader.clone(),
        leader_tx,
        event_rx,
        shutdown_rx,
    );

    MockEngineContext {
        engine,
        event_tx,
        leader,
        leader_rx,
        shutdown_tx,
    }
}
