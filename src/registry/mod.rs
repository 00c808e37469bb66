//! Membership registry abstraction.
//!
//! The registry is the shared ordered collection of peer identifiers known
//! to be participating in the current round. It is a shared mutable resource
//! with at-least-once add semantics: `add` must be safe under concurrent
//! issuance by multiple peers. There is no transactional guarantee between a
//! membership read and a voter tally; the stop condition relies on the
//! membership list being monotonically non-decreasing within a round.
//!
//! Implementations backed by an external keyed store conventionally persist
//! the list under `election:store:nodes` and the round token under
//! `election:store:round_epoch`.

mod mem_registry;
pub use mem_registry::*;


use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::PeerId;
use crate::Result;
use crate::RoundEpoch;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Registry: Send + Sync + 'static {
    /// Add-if-absent insertion. Idempotent; concurrent adds of the same
    /// identifier must leave a single entry.
    async fn add(
        &self,
        id: PeerId,
    ) -> Result<()>;

    /// Ordered snapshot of the current membership.
    async fn members(&self) -> Result<Vec<PeerId>>;

    /// Membership test.
    async fn contains(
        &self,
        id: PeerId,
    ) -> Result<bool>;

    /// Open a round: clears the membership list only when `epoch` is
    /// strictly newer than the stored round token, and records the new
    /// token. Returns whether a reset happened.
    ///
    /// Safe for every peer of a round to call with the same epoch; exactly
    /// one call observes `true`.
    async fn begin_round(
        &self,
        epoch: RoundEpoch,
    ) -> Result<bool>;
}
