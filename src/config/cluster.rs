use std::path::PathBuf;

use config::ConfigError;
use rand::Rng;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Node identity and observability settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClusterConfig {
    /// This peer's identifier, unique within one election round.
    /// `0` means "not assigned": the builder draws a small random identifier
    /// at startup.
    #[serde(default)]
    pub node_id: u32,

    /// Directory for node log files
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Whether to expose a Prometheus scrape endpoint
    #[serde(default = "default_prometheus_enabled")]
    pub prometheus_enabled: bool,

    /// Port of the Prometheus scrape endpoint
    #[serde(default = "default_prometheus_port")]
    pub prometheus_port: u16,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            node_id: 0,
            log_dir: default_log_dir(),
            prometheus_enabled: default_prometheus_enabled(),
            prometheus_port: default_prometheus_port(),
        }
    }
}

impl ClusterConfig {
    /// Resolve the node identifier, drawing a small random one when the
    /// configured value is 0. Idempotent: a resolved or explicitly
    /// configured identifier is returned as-is.
    pub fn resolve_node_id(&mut self) -> u32 {
        if self.node_id == 0 {
            self.node_id = rand::thread_rng().gen_range(1..=255);
        }
        self.node_id
    }

    pub fn validate(&self) -> Result<()> {
        if self.prometheus_enabled && self.prometheus_port == 0 {
            return Err(Error::Config(ConfigError::Message(
                "prometheus_port must be set when prometheus_enabled is true".into(),
            )));
        }

        Ok(())
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}
fn default_prometheus_enabled() -> bool {
    true
}
fn default_prometheus_port() -> u16 {
    9100
}
