use std::fmt::Debug;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use autometrics::autometrics;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::StopConditionTracker;
use crate::alias::BOF;
use crate::alias::ROF;
use crate::is_better_or_equal;
use crate::metrics::BROADCASTS_SENT;
use crate::metrics::CRITERIA_COMPARISONS;
use crate::metrics::ELECTIONS_DECIDED;
use crate::metrics::MALFORMED_PAYLOADS;
use crate::metrics::VOTERS_RECORDED;
use crate::Criteria;
use crate::Election;
use crate::ElectionEvent;
use crate::ElectionPhase;
use crate::MessageBus;
use crate::NodeConfig;
use crate::PeerId;
use crate::RawMessage;
use crate::Registry;
use crate::Result;
use crate::TransportError;
use crate::TypeConfig;
use crate::API_SLO;

/// Per-peer election state machine.
///
/// Reacts to the three bus topics plus the injected `LeaderLost` event,
/// updates local state, and decides when to re-broadcast, register
/// membership, or declare a winner. Reactions within one peer are
/// serialized by the event loop: each runs to completion, settling window
/// included, before the next queued reaction begins. Across peers,
/// reactions are fully concurrent and unordered.
pub struct ElectionEngine<T>
where
    T: TypeConfig,
{
    node_id: PeerId,
    phase: ElectionPhase,

    /// This peer's own candidacy claim, seeded at round start and carried
    /// unchanged; superior claims are relayed, not adopted into it.
    criteria: Criteria,
    tracker: StopConditionTracker,

    /// Set once the self-registration hook has confirmed membership; the
    /// hook is a no-op afterwards.
    registered: bool,

    registry: Arc<ROF<T>>,
    bus: Arc<BOF<T>>,
    config: Arc<NodeConfig>,

    /// Published outcome, readable without locking.
    leader: Arc<ArcSwapOption<PeerId>>,
    leader_tx: watch::Sender<Option<PeerId>>,

    /// Node-local event injection (e.g. `LeaderLost`), cloned to [`Node`].
    ///
    /// [`Node`]: crate::Node
    event_rx: mpsc::Receiver<ElectionEvent>,

    shutdown_signal: watch::Receiver<()>,
}

impl<T> ElectionEngine<T>
where
    T: TypeConfig,
{
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        node_id: PeerId,
        registry: Arc<ROF<T>>,
        bus: Arc<BOF<T>>,
        config: Arc<NodeConfig>,
        leader: Arc<ArcSwapOption<PeerId>>,
        leader_tx: watch::Sender<Option<PeerId>>,
        event_rx: mpsc::Receiver<ElectionEvent>,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        Self {
            node_id,
            phase: ElectionPhase::Idle,
            criteria: Criteria::seed(node_id),
            tracker: StopConditionTracker::new(node_id),
            registered: false,
            registry,
            bus,
            config,
            leader,
            leader_tx,
            event_rx,
            shutdown_signal,
        }
    }

    /// Run one election round and stay reactive until shutdown.
    ///
    /// Opens the bus subscription first so no frame published after start is
    /// missed, presents the round epoch to the registry, then issues the
    /// initial criteria broadcast and enters the event loop. The loop keeps
    /// running after a decision so a `LeaderLost` injection can re-arm the
    /// round.
    pub async fn run(&mut self) -> Result<()> {
        let mut bus_rx = self.bus.subscribe()?;

        let epoch = self.config.election.round_epoch;
        if self.registry.begin_round(epoch).await? {
            info!("[{}] initialized election round {}", self.node_id, epoch);
        }

        self.phase = ElectionPhase::Electing;
        info!("[{}] entering election with criteria {:?}", self.node_id, self.criteria);
        self.broadcast_criteria().await?;

        loop {
            tokio::select! {
                // Use biased to ensure branch order
                biased;
                // P0: shutdown received;
                _ = self.shutdown_signal.changed() => {
                    warn!("[{}] shutdown signal received.", self.node_id);
                    return Ok(());
                }

                // P1: locally injected events (LeaderLost, test drivers)
                Some(event) = self.event_rx.recv() => {
                    debug!("[{}] receive injected event: {:?}", self.node_id, event);
                    self.handle_event(event).await?;
                }

                // P2: inbound bus frames
                frame = bus_rx.recv() => match frame {
                    Ok(raw) => {
                        // any inbound chatter proves peers exist
                        self.on_traffic().await?;

                        match ElectionEvent::try_from(&raw) {
                            Ok(event) => self.handle_event(event).await?,
                            Err(e) => {
                                MALFORMED_PAYLOADS
                                    .with_label_values(&[&self.node_id.to_string(), raw.topic.as_str()])
                                    .inc();
                                warn!("[{}] dropping malformed frame on {}: {}", self.node_id, raw.topic.as_str(), e);
                            }
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        // survivable under at-most-once delivery; surfaced as
                        // the transport error it is, but not propagated
                        warn!("[{}] bus subscription degraded: {}", self.node_id, TransportError::Lagged(n));
                    }
                    Err(RecvError::Closed) => {
                        return Err(TransportError::ChannelClosed.into());
                    }
                }
            }
        }
    }

    pub(crate) async fn handle_event(
        &mut self,
        event: ElectionEvent,
    ) -> Result<()> {
        match event {
            ElectionEvent::Criteria(c) => self.handle_criteria(c).await,
            ElectionEvent::PeerEntered(e) => self.handle_peer_entered(e).await,
            ElectionEvent::LeaderElected(e) => self.handle_leader_elected(e).await,
            ElectionEvent::LeaderLost => self.handle_leader_lost().await,
        }
    }

    /// Self-registration hook, debounced by the traffic settling window:
    /// the first inbound frame proves other peers can hear us, so join the
    /// membership list exactly once and announce ourselves.
    #[autometrics(objective = API_SLO)]
    pub(crate) async fn on_traffic(&mut self) -> Result<()> {
        if self.registered {
            return Ok(());
        }

        sleep(self.config.election.settle_on_traffic()).await;

        if !self.registry.contains(self.node_id).await? {
            self.registry.add(self.node_id).await?;
            info!("[on_traffic] new node added on list: {}", self.node_id);
            self.publish(RawMessage::node_entered(&Election { id: self.node_id })?)
                .await?;
        }
        self.registered = true;

        Ok(())
    }

    #[autometrics(objective = API_SLO)]
    pub(crate) async fn handle_criteria(
        &mut self,
        c: Criteria,
    ) -> Result<()> {
        sleep(self.config.election.settle_on_message()).await;

        if self.phase.is_decided() {
            debug!("[{}] decided; criteria from {} ignored", self.node_id, c.sender_id);
            return Ok(());
        }

        let nodes = self.registry.members().await?;
        if nodes.is_empty() || (nodes.len() == 1 && nodes[0] == self.node_id) {
            info!("[on_message] alone on the list, I am the leader: {}", self.node_id);
            self.publish(RawMessage::node_elected(&Election { id: self.node_id })?)
                .await?;
            self.decide(self.node_id);
            return Ok(());
        }

        // do not re-process one's own echoed broadcast
        if c.sender_id == self.node_id {
            return Ok(());
        }

        debug!("[on_message] comparing {:?} with {:?}", self.criteria.params, c.params);
        if is_better_or_equal(&self.criteria.params, &c.params) {
            CRITERIA_COMPARISONS
                .with_label_values(&[&self.node_id.to_string(), "kept"])
                .inc();
            self.broadcast_criteria().await?;
        } else {
            // re-stamp the superior claim as relayed by self; this is how a
            // winning candidacy propagates transitively
            CRITERIA_COMPARISONS
                .with_label_values(&[&self.node_id.to_string(), "relayed"])
                .inc();
            let relay = Criteria::relay(self.node_id, c.params.clone());
            debug!("[on_message] relaying superior claim: {:?}", relay);
            self.publish(RawMessage::criteria(&relay)?).await?;
        }

        // fresh membership snapshot at tally time; growth since the read
        // above must push the finish line out, not be compared stale
        let nodes = self.registry.members().await?;
        let voters_before = self.tracker.voter_count();
        let tally = self.tracker.update(&c, &nodes);
        if self.tracker.voter_count() > voters_before {
            VOTERS_RECORDED
                .with_label_values(&[&self.node_id.to_string()])
                .inc();
        }

        if tally.done {
            let winner = tally.winner.unwrap_or(self.node_id);
            info!("[on_message] stop condition reached! Leader is: {}", winner);
            self.publish(RawMessage::node_elected(&Election { id: winner })?)
                .await?;
            self.decide(winner);
        }

        Ok(())
    }

    #[autometrics(objective = API_SLO)]
    pub(crate) async fn handle_peer_entered(
        &mut self,
        e: Election,
    ) -> Result<()> {
        sleep(self.config.election.settle_on_enter()).await;

        // ignore when the enter event was triggered by myself
        if e.id == self.node_id {
            return Ok(());
        }

        if self.phase.is_decided() {
            debug!("[{}] decided; node_entered({}) ignored", self.node_id, e.id);
            return Ok(());
        }

        info!("[on_node_enter] node entered: {}", e.id);
        // a newcomer resets the propagation wave so it is reachable and
        // included in future stop-condition accounting
        self.broadcast_criteria().await
    }

    #[autometrics(objective = API_SLO)]
    pub(crate) async fn handle_leader_elected(
        &mut self,
        e: Election,
    ) -> Result<()> {
        sleep(self.config.election.settle_on_elected()).await;

        info!("LEADER ELECTED {}", e.id);
        self.decide(e.id);

        Ok(())
    }

    /// Revocable terminal transition: `Decided` back to `Electing`.
    pub(crate) async fn handle_leader_lost(&mut self) -> Result<()> {
        if !self.phase.is_decided() {
            debug!("[{}] leader_lost ignored while {}", self.node_id, self.phase.as_str());
            return Ok(());
        }

        warn!("[{}] leader lost, re-arming election", self.node_id);
        self.tracker.reset();
        self.leader.store(None);
        let _ = self.leader_tx.send(None);
        self.phase = ElectionPhase::Electing;

        self.broadcast_criteria().await
    }

    async fn broadcast_criteria(&self) -> Result<()> {
        debug!("[{}] broadcasting criteria: {:?}", self.node_id, self.criteria);
        self.publish(RawMessage::criteria(&self.criteria)?).await
    }

    async fn publish(
        &self,
        frame: RawMessage,
    ) -> Result<()> {
        BROADCASTS_SENT
            .with_label_values(&[&self.node_id.to_string(), frame.topic.as_str()])
            .inc();
        self.bus.publish(frame).await
    }

    /// Record the outcome and stop broadcasting.
    fn decide(
        &mut self,
        winner: PeerId,
    ) {
        if self.phase.is_decided() {
            let current = self.leader.load().as_deref().copied();
            if current == Some(winner) {
                debug!("[{}] duplicate result for {} ignored", self.node_id, winner);
                return;
            }
            // conflicting duplicate announcements are a known logical race;
            // last writer wins, surfaced in the log
            warn!(
                "[{}] conflicting result: recorded {:?}, now {}",
                self.node_id, current, winner
            );
        }

        self.phase = ElectionPhase::Decided;
        self.leader.store(Some(Arc::new(winner)));
        let _ = self.leader_tx.send(Some(winner));
        ELECTIONS_DECIDED
            .with_label_values(&[&self.node_id.to_string(), &winner.to_string()])
            .inc();
        info!("[{}] election decided: leader is {}", self.node_id, winner);
    }

    pub(crate) fn phase(&self) -> ElectionPhase {
        self.phase
    }

    #[cfg(test)]
    pub(crate) fn current_leader(&self) -> Option<PeerId> {
        self.leader.load().as_deref().copied()
    }

    #[cfg(test)]
    pub(crate) fn voter_count(&self) -> usize {
        self.tracker.voter_count()
    }
}

impl<T: TypeConfig> Debug for ElectionEngine<T> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ElectionEngine")
            .field("node_id", &self.node_id)
            .field("phase", &self.phase)
            .finish()
    }
}
