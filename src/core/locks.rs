use crate::domain::model::RoundNumber;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per round, created on first use.
#[derive(Default)]
pub struct RoundLocks {
    locks: Mutex<HashMap<RoundNumber, Arc<AsyncMutex<()>>>>,
}

impl RoundLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `round`. Other rounds are unaffected.
    pub async fn lock(&self, round: RoundNumber) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(round).or_default())
        };
        lock.lock_owned().await
    }

    /// Drops every lock. Only call while no round lock can be held.
    pub fn clear(&self) {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
