use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::Registry;
use crate::PeerId;
use crate::Result;
use crate::RoundEpoch;

/// In-process reference implementation of [`Registry`].
///
/// Cloning shares the underlying store, so peers hosted in one process (or
/// one test) observe the same membership list. Insertion order is preserved;
/// `members` returns peers in the order they first registered.
#[derive(Debug, Clone, Default)]
pub struct MemRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    /// Round token; 0 is the pre-round state.
    epoch: RoundEpoch,
    members: Vec<PeerId>,
}

impl MemRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Registry for MemRegistry {
    async fn add(
        &self,
        id: PeerId,
    ) -> Result<()> {
        let mut inner = self.inner.lock();
        if !inner.members.contains(&id) {
            inner.members.push(id);
            debug!("registry: added node {}", id);
        }
        Ok(())
    }

    async fn members(&self) -> Result<Vec<PeerId>> {
        Ok(self.inner.lock().members.clone())
    }

    async fn contains(
        &self,
        id: PeerId,
    ) -> Result<bool> {
        Ok(self.inner.lock().members.contains(&id))
    }

    async fn begin_round(
        &self,
        epoch: RoundEpoch,
    ) -> Result<bool> {
        let mut inner = self.inner.lock();
        if epoch > inner.epoch {
            inner.epoch = epoch;
            inner.members.clear();
            debug!("registry: round {} opened, membership reset", epoch);
            return Ok(true);
        }
        Ok(false)
    }
}
