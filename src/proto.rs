//! Wire data model for the election protocol.
//!
//! Everything that crosses the messaging bus is one of three payloads:
//! [`Criteria`] on the `message` topic, and [`Election`] on the
//! `node_entered` / `node_elected` topics. Payloads are bincode-encoded and
//! wrapped in a topic-tagged [`RawMessage`] frame.

use serde::Deserialize;
use serde::Serialize;

use crate::constants::TOPIC_MESSAGE;
use crate::constants::TOPIC_NODE_ELECTED;
use crate::constants::TOPIC_NODE_ENTERED;
use crate::Result;
use crate::SerializationError;

/// Opaque comparable peer identifier, unique per process for the lifetime of
/// one election round.
pub type PeerId = u32;

/// Monotonic round token stored in the membership registry. A round begins
/// when the first peer presents an epoch newer than the stored one.
pub type RoundEpoch = u64;

/// A candidacy claim: "I believe the leader is `master_id`, backed by
/// priority `age`".
///
/// `age` is always the claiming peer's own identifier interpreted
/// numerically. It is the ranking key and is never synthesized from anything
/// else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    pub master_id: PeerId,
    pub age: u64,
}

impl Params {
    pub fn seed(id: PeerId) -> Self {
        Self {
            master_id: id,
            age: u64::from(id),
        }
    }
}

/// A criteria broadcast, always attributed to the peer that last
/// re-transmitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    pub sender_id: PeerId,
    pub params: Params,
}

impl Criteria {
    /// The claim a peer holds at round start: itself as leader, its own
    /// identifier as priority.
    pub fn seed(id: PeerId) -> Self {
        Self {
            sender_id: id,
            params: Params::seed(id),
        }
    }

    /// Re-stamp a superior claim as relayed by `sender_id`. This is how a
    /// winning candidacy propagates transitively through the broadcast
    /// topology.
    pub fn relay(
        sender_id: PeerId,
        params: Params,
    ) -> Self {
        Self { sender_id, params }
    }
}

/// Result/event envelope used for both "peer joined" and "leader elected"
/// notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    pub id: PeerId,
}

/// The three pub/sub topics of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Criteria broadcasts.
    Message,
    /// A newly joined peer announces itself.
    NodeEntered,
    /// The final result announcement.
    NodeElected,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Message => TOPIC_MESSAGE,
            Topic::NodeEntered => TOPIC_NODE_ENTERED,
            Topic::NodeElected => TOPIC_NODE_ELECTED,
        }
    }
}

/// One topic-tagged frame as the bus transports it. The payload is the
/// bincode encoding of the topic's payload type.
#[derive(Debug, Clone)]
pub struct RawMessage {
    pub topic: Topic,
    pub payload: Vec<u8>,
}

impl RawMessage {
    pub fn criteria(c: &Criteria) -> Result<Self> {
        Ok(Self {
            topic: Topic::Message,
            payload: bincode::serialize(c).map_err(SerializationError::Bincode)?,
        })
    }

    pub fn node_entered(e: &Election) -> Result<Self> {
        Ok(Self {
            topic: Topic::NodeEntered,
            payload: bincode::serialize(e).map_err(SerializationError::Bincode)?,
        })
    }

    pub fn node_elected(e: &Election) -> Result<Self> {
        Ok(Self {
            topic: Topic::NodeElected,
            payload: bincode::serialize(e).map_err(SerializationError::Bincode)?,
        })
    }
}
