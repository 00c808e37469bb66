use std::collections::HashSet;

use tracing::debug;

use crate::Criteria;
use crate::PeerId;

/// Per-peer accumulator of which other peers have conceded leadership to
/// this peer; drives termination.
///
/// Convergence is detected by unanimity: every other known peer must, at
/// some point, have relayed a claim naming this peer as leader, proving the
/// claim propagated through the whole known membership. The voter set grows
/// monotonically within a round and never contains the peer itself.
#[derive(Debug)]
pub struct StopConditionTracker {
    node_id: PeerId,
    voters: HashSet<PeerId>,
}

/// Outcome of one tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub done: bool,
    pub winner: Option<PeerId>,
}

impl StopConditionTracker {
    pub fn new(node_id: PeerId) -> Self {
        Self {
            node_id,
            voters: HashSet::new(),
        }
    }

    /// Tally one received criteria against the membership snapshot taken at
    /// tally time. The others-count is recomputed from `members` on every
    /// call, never cached, so a registry that grows mid-round is re-evaluated
    /// rather than compared against a stale count.
    pub fn update(
        &mut self,
        c: &Criteria,
        members: &[PeerId],
    ) -> Tally {
        let others_count = members.iter().filter(|m| **m != self.node_id).count();

        let says_its_me = c.params.master_id == self.node_id;
        if says_its_me && c.sender_id != self.node_id && self.voters.insert(c.sender_id) {
            debug!(
                "[{}] voter recorded: {} ({}/{} concessions)",
                self.node_id,
                c.sender_id,
                self.voters.len(),
                others_count
            );
        }

        if self.voters.len() == others_count {
            Tally {
                done: true,
                winner: Some(self.node_id),
            }
        } else {
            Tally {
                done: false,
                winner: None,
            }
        }
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    /// Forget all concessions; used when a decided election is revoked.
    pub fn reset(&mut self) {
        self.voters.clear();
    }
}
