use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Messaging bus parameters.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BusConfig {
    /// Capacity of the broadcast channel. Subscribers that fall further
    /// behind than this lose frames (delivery is at-most-once).
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl BusConfig {
    pub fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 {
            return Err(Error::Config(ConfigError::Message(
                "bus channel_capacity must be > 0".into(),
            )));
        }

        Ok(())
    }
}

fn default_channel_capacity() -> usize {
    256
}
