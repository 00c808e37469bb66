//! A builder pattern implementation for constructing a [`Node`] instance.
//!
//! The [`NodeBuilder`] provides a fluent interface to configure and assemble
//! the components an election node needs: the shared membership registry and
//! the messaging bus.
//!
//! ## Key Design Points
//! - **Default Components**: Initializes with in-process defaults (shared memory registry,
//!   broadcast-channel bus).
//! - **Customization**: Allows overriding defaults via setter methods (e.g., `registry()`, `bus()`)
//!   so several nodes in one process can share a single registry and bus.
//! - **Lifecycle Management**:
//!   - `build()`: Assembles the [`Node`] around a fresh engine.
//!   - `start_metrics_server()`: Launches the Prometheus endpoint.
//!   - `ready()`: Finalizes construction and returns the initialized [`Node`].
//!
//! ## Example
//! ```ignore
//!
//! let (shutdown_tx, shutdown_rx) = watch::channel(());
//! let node = NodeBuilder::new(None, shutdown_rx)
//!     .registry(shared_registry)  // Optional override
//!     .bus(shared_bus)
//!     .build()
//!     .start_metrics_server(shutdown_tx.subscribe())
//!     .ready()
//!     .unwrap();
//! ```

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::sync::Mutex;
use tracing::info;

use crate::alias::BOF;
use crate::alias::ROF;
use crate::metrics;
use crate::BroadcastBus;
use crate::BroadcastTypeConfig;
use crate::ElectionEngine;
use crate::MemRegistry;
use crate::Node;
use crate::NodeConfig;
use crate::PeerId;
use crate::Result;
use crate::SystemError;

/// Builder pattern implementation for constructing an election node with
/// configurable components. Provides a fluent interface to set up node
/// configuration, registry, and bus.
pub struct NodeBuilder {
    node_id: PeerId,
    pub(super) node_config: NodeConfig,
    pub(super) registry: Option<Arc<ROF<BroadcastTypeConfig>>>,
    pub(super) bus: Option<Arc<BOF<BroadcastTypeConfig>>>,
    pub(super) shutdown_signal: watch::Receiver<()>,

    pub(super) node: Option<Arc<Node<BroadcastTypeConfig>>>,
}

impl NodeBuilder {
    /// Creates a new NodeBuilder with configuration loaded from file and
    /// environment
    ///
    /// # Arguments
    /// * `override_path` - Optional path to a node-specific configuration file
    /// * `shutdown_signal` - Watch channel for graceful shutdown signaling
    ///
    /// # Panics
    /// Will panic if configuration loading fails (consider returning Result
    /// instead)
    pub fn new(
        override_path: Option<&str>,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        if let Some(p) = override_path {
            info!("with override config from: {}", p);
        }
        let node_config = NodeConfig::load(override_path).expect("Load node_config successfully");
        Self::init(node_config, shutdown_signal)
    }

    /// Constructs NodeBuilder from an in-memory configuration
    pub fn from_config(
        node_config: NodeConfig,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        Self::init(node_config, shutdown_signal)
    }

    /// Core initialization logic shared by all construction paths.
    ///
    /// A configured `node_id` of 0 means "assign one": the node draws a small
    /// random identifier, which doubles as its election priority.
    pub fn init(
        mut node_config: NodeConfig,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        if node_config.cluster.node_id == 0 {
            let id = node_config.cluster.resolve_node_id();
            info!("assigned random node_id: {}", id);
        }

        Self {
            node_id: node_config.cluster.node_id,
            node_config,
            registry: None,
            bus: None,
            shutdown_signal,
            node: None,
        }
    }

    /// Sets a custom membership registry, typically one shared between the
    /// nodes of a process or backed by an external store
    pub fn registry(
        mut self,
        registry: Arc<ROF<BroadcastTypeConfig>>,
    ) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets a custom messaging bus shared with the other peers
    pub fn bus(
        mut self,
        bus: Arc<BOF<BroadcastTypeConfig>>,
    ) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Replaces the entire node configuration
    pub fn node_config(
        mut self,
        node_config: NodeConfig,
    ) -> Self {
        self.node_config = node_config;
        self
    }

    /// Finalizes the builder and constructs the node instance.
    ///
    /// Initializes default implementations for any unconfigured components:
    /// a fresh shared-memory registry and a broadcast-channel bus sized from
    /// the configuration. Note that a node built entirely on defaults talks
    /// to nobody; real deployments pass a shared registry and bus.
    pub fn build(mut self) -> Self {
        let node_id = self.node_id;
        let node_config = Arc::new(self.node_config.clone());

        let registry = self.registry.take().unwrap_or_else(|| Arc::new(MemRegistry::new()));
        let bus = self
            .bus
            .take()
            .unwrap_or_else(|| Arc::new(BroadcastBus::new(node_config.bus.channel_capacity)));

        let leader = Arc::new(ArcSwapOption::from(None));
        let (leader_tx, leader_rx) = watch::channel(None);
        let (event_tx, event_rx) = mpsc::channel(node_config.election.event_channel_capacity);

        let engine = ElectionEngine::<BroadcastTypeConfig>::new(
            node_id,
            registry,
            bus,
            node_config.clone(),
            leader.clone(),
            leader_tx,
            event_rx,
            self.shutdown_signal.clone(),
        );

        let node = Node::<BroadcastTypeConfig> {
            id: node_id,
            engine: Arc::new(Mutex::new(engine)),
            event_tx,
            ready: AtomicBool::new(false),
            started: AtomicBool::new(false),
            leader,
            leader_rx,
            node_config,
        };

        self.node = Some(Arc::new(node));
        self
    }

    /// Starts the metrics server for monitoring node operations.
    ///
    /// Launches a Prometheus endpoint on the configured port. A no-op when
    /// monitoring is disabled in the configuration.
    pub fn start_metrics_server(
        self,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        if !self.node_config.cluster.prometheus_enabled {
            return self;
        }

        info!("start metrics server!");
        let port = self.node_config.cluster.prometheus_port;
        tokio::spawn(async move {
            metrics::start_server(port, shutdown_signal).await;
        });
        self
    }

    /// Returns the built node instance after successful construction.
    ///
    /// # Errors
    /// Returns a start failure if build hasn't completed
    pub fn ready(self) -> Result<Arc<Node<BroadcastTypeConfig>>> {
        self.node
            .ok_or_else(|| SystemError::NodeStartFailed("check node ready failed".to_string()).into())
    }
}
