//! Decentralized leader election over a broadcast pub/sub bus.
//!
//! Every peer starts as a candidate, broadcasts its candidacy criteria, and
//! relays any superior claim it hears. A round ends when every other known
//! peer has conceded to the same candidate, which then announces itself on
//! the result topic. Membership is discovered along the way through a shared
//! registry; no peer needs the full roster up front.

mod bus;
mod config;
mod constants;
mod core;
mod errors;
mod metrics;
mod node;
mod proto;
mod registry;
mod type_config;
pub mod utils;

pub use crate::core::*;

pub use bus::*;
pub use config::*;
pub use errors::*;
pub use metrics::*;
pub use node::*;
pub use proto::*;
pub use registry::*;
pub use type_config::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
//-----------------------------------------------------------
// Autometrics
/// autometrics: https://docs.autometrics.dev/rust/adding-alerts-and-slos
use autometrics::objectives::Objective;
use autometrics::objectives::ObjectiveLatency;
use autometrics::objectives::ObjectivePercentile;
const API_SLO: Objective = Objective::new("api")
    .success_rate(ObjectivePercentile::P99_9)
    .latency(ObjectiveLatency::Ms10, ObjectivePercentile::P99);
