//! Per-player serialization of workflow instances.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::state::PlayerId;

/// Hands out one async mutex per player. Distinct players never contend.
#[derive(Debug, Default)]
pub struct PlayerLocks {
    inner: DashMap<PlayerId, Arc<Mutex<()>>>,
}

impl PlayerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, player_id: &PlayerId) -> OwnedMutexGuard<()> {
        // Clone out of the shard before awaiting so the map is never held
        // across a suspension point.
        let mutex = self
            .inner
            .entry(player_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    /// Drop entries nobody holds or waits on.
    pub fn prune(&self) {
        self.inner.retain(|_, m| Arc::strong_count(m) > 1);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
