//! Configuration management module for the election node.
//!
//! Provides hierarchical configuration loading from multiple sources with
//! priority:
//! 1. Default values (hardcoded)
//! 2. Main config file (`config/election`, optional)
//! 3. Node-specific override file
//! 4. Environment variables (highest priority)

mod bus;
mod cluster;
mod election;
pub use bus::*;
pub use cluster::*;
pub use election::*;


//---
use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NodeConfig {
    /// Node identity and observability settings
    #[serde(default)]
    pub cluster: ClusterConfig,

    /// Core election protocol parameters
    #[serde(default)]
    pub election: ElectionConfig,

    /// Messaging bus parameters
    #[serde(default)]
    pub bus: BusConfig,
}

impl NodeConfig {
    /// Load configuration with priority: defaults < base config file <
    /// node-specific override < `ELECTION`-prefixed environment variables.
    ///
    /// # Arguments
    /// * `override_path` - Optional path to a node-specific configuration file
    pub fn load(override_path: Option<&str>) -> Result<Self> {
        let mut config = Config::builder();

        // 1. Base config (optional; defaults cover a bare environment)
        config = config.add_source(File::with_name("config/election").required(false));

        // 2. Overwrite with node-specific config
        if let Some(custom) = override_path {
            config = config.add_source(File::with_name(custom).required(true));
        }

        // 3. Environment variables (highest priority)
        config = config.add_source(
            Environment::with_prefix("ELECTION")
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let settings: NodeConfig = config.build()?.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    /// Validates all subsystem configurations
    pub fn validate(&self) -> Result<()> {
        self.cluster.validate()?;
        self.election.validate()?;
        self.bus.validate()?;

        Ok(())
    }
}
