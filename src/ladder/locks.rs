//! Per-player serialization of match resolution
//!
//! A match reads two ratings and writes them back. Holding both players'
//! locks across that read-compute-write sequence keeps concurrent matches
//! involving the same player from computing deltas off a stale rating.

use crate::types::PlayerName;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as TokioMutex, OwnedMutexGuard};

/// Table of lazily created per-player async mutexes
#[derive(Debug, Default)]
pub struct PlayerLocks {
    locks: Mutex<HashMap<PlayerName, Arc<TokioMutex<()>>>>,
}

/// Guards for every player locked by one [`PlayerLocks::lock_all`] call
#[derive(Debug)]
pub struct PlayerLockGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl PlayerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, name: &str) -> Arc<TokioMutex<()>> {
        // A poisoned table only means another thread panicked mid-insert;
        // the map itself is still usable.
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(TokioMutex::new(())))
            .clone()
    }

    /// Lock every named player, in sorted order so two callers locking
    /// overlapping sets can never deadlock. Duplicate names are locked once.
    pub async fn lock_all(&self, names: &[&str]) -> PlayerLockGuard {
        let mut ordered: Vec<&str> = names.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        let mut guards = Vec::with_capacity(ordered.len());
        for name in ordered {
            guards.push(self.handle(name).lock_owned().await);
        }

        PlayerLockGuard { _guards: guards }
    }

    /// Number of players that have ever been locked
    pub fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
