use tracing::warn;

use crate::Criteria;
use crate::Election;
use crate::RawMessage;
use crate::SerializationError;
use crate::Topic;

/// One inbound reaction trigger for the election state machine.
///
/// The first three map onto the bus topics. `LeaderLost` has no bus topic:
/// it is the re-arm event an external liveness monitor may inject through a
/// node's event channel to revoke a decided election.
#[derive(Debug, Clone)]
pub enum ElectionEvent {
    /// A criteria broadcast on the `message` topic.
    Criteria(Criteria),

    /// A peer announced itself on the `node_entered` topic.
    PeerEntered(Election),

    /// A result announcement on the `node_elected` topic.
    LeaderElected(Election),

    /// The decided leader is gone; drive `Decided` back to `Electing`.
    LeaderLost,
}

impl TryFrom<&RawMessage> for ElectionEvent {
    type Error = SerializationError;

    /// Decode a bus frame into its event. A malformed payload is a fatal
    /// decode error for that single frame only; the caller logs and drops it
    /// without crashing the peer.
    fn try_from(raw: &RawMessage) -> std::result::Result<Self, SerializationError> {
        match raw.topic {
            Topic::Message => {
                let c: Criteria = bincode::deserialize(&raw.payload).map_err(|e| {
                    warn!("malformed criteria payload on {}: {}", raw.topic.as_str(), e);
                    SerializationError::Bincode(e)
                })?;
                Ok(ElectionEvent::Criteria(c))
            }
            Topic::NodeEntered => {
                let e: Election = bincode::deserialize(&raw.payload).map_err(|e| {
                    warn!("malformed election payload on {}: {}", raw.topic.as_str(), e);
                    SerializationError::Bincode(e)
                })?;
                Ok(ElectionEvent::PeerEntered(e))
            }
            Topic::NodeElected => {
                let e: Election = bincode::deserialize(&raw.payload).map_err(|e| {
                    warn!("malformed election payload on {}: {}", raw.topic.as_str(), e);
                    SerializationError::Bincode(e)
                })?;
                Ok(ElectionEvent::LeaderElected(e))
            }
        }
    }
}
