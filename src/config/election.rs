use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Core election protocol parameters.
///
/// The four settling windows dampen broadcast storms right after a round
/// reset. They carry no correctness weight: the protocol must converge with
/// all of them set to zero, and the test suite runs that way.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ElectionConfig {
    /// Pause before reacting to generic inbound traffic (self-registration
    /// hook)
    #[serde(default = "default_settle_on_traffic_ms")]
    pub settle_on_traffic_ms: u64,

    /// Pause before reacting to a criteria broadcast
    #[serde(default = "default_settle_ms")]
    pub settle_on_message_ms: u64,

    /// Pause before reacting to a peer-joined announcement
    #[serde(default = "default_settle_ms")]
    pub settle_on_enter_ms: u64,

    /// Pause before reacting to a result announcement
    #[serde(default = "default_settle_ms")]
    pub settle_on_elected_ms: u64,

    /// Round token presented to the registry at start. The first peer whose
    /// epoch is newer than the stored one resets the membership list; every
    /// other peer's call is a no-op.
    #[serde(default = "default_round_epoch")]
    pub round_epoch: u64,

    /// Capacity of the node-local event injection channel
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            settle_on_traffic_ms: default_settle_on_traffic_ms(),
            settle_on_message_ms: default_settle_ms(),
            settle_on_enter_ms: default_settle_ms(),
            settle_on_elected_ms: default_settle_ms(),
            round_epoch: default_round_epoch(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

impl ElectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.round_epoch == 0 {
            return Err(Error::Config(ConfigError::Message(
                "round_epoch must be greater than 0 (0 is the registry's pre-round state)".into(),
            )));
        }

        if self.event_channel_capacity == 0 {
            return Err(Error::Config(ConfigError::Message(
                "event_channel_capacity must be > 0".into(),
            )));
        }

        Ok(())
    }

    pub fn settle_on_traffic(&self) -> Duration {
        Duration::from_millis(self.settle_on_traffic_ms)
    }
    pub fn settle_on_message(&self) -> Duration {
        Duration::from_millis(self.settle_on_message_ms)
    }
    pub fn settle_on_enter(&self) -> Duration {
        Duration::from_millis(self.settle_on_enter_ms)
    }
    pub fn settle_on_elected(&self) -> Duration {
        Duration::from_millis(self.settle_on_elected_ms)
    }
}

fn default_settle_on_traffic_ms() -> u64 {
    5000
}
fn default_settle_ms() -> u64 {
    1000
}
fn default_round_epoch() -> u64 {
    1
}
fn default_event_channel_capacity() -> usize {
    64
}
