// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-entity FIFO lock queue.
//!
//! A mutation holds the keys of every entity it touches from snapshot to
//! commit or rollback, so a rollback only ever restores values no other
//! mutation has changed in the meantime.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Lockable unit of state
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LockKey {
    /// Every job mutation: order is a property of the whole list
    JobList,
    Candidate(String),
    Assessment(String),
    Response(String),
}

impl fmt::Display for LockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockKey::JobList => f.write_str("jobs"),
            LockKey::Candidate(id) => write!(f, "candidate:{}", id),
            LockKey::Assessment(job_id) => write!(f, "assessment:{}", job_id),
            LockKey::Response(id) => write!(f, "response:{}", id),
        }
    }
}

type Slots = Arc<Mutex<HashMap<LockKey, Arc<AsyncMutex<()>>>>>;

#[derive(Clone, Default)]
pub struct KeyedLocks {
    slots: Slots,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire every key, in sorted order. Waiters on one key are served
    /// first come, first served.
    pub async fn acquire(&self, keys: impl IntoIterator<Item = LockKey>) -> KeyGuard {
        let mut keys: Vec<LockKey> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in &keys {
            let slot = self.slot(key);
            guards.push(slot.lock_owned().await);
        }
        tracing::trace!(keys = keys.len(), "acquired");

        KeyGuard {
            keys,
            guards,
            slots: Arc::clone(&self.slots),
        }
    }

    fn slot(&self, key: &LockKey) -> Arc<AsyncMutex<()>> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    /// Keys with a live slot (held or awaited)
    pub fn active(&self) -> usize {
        self.slots.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Held keys; released on drop
pub struct KeyGuard {
    keys: Vec<LockKey>,
    guards: Vec<OwnedMutexGuard<()>>,
    slots: Slots,
}

impl KeyGuard {
    pub fn keys(&self) -> &[LockKey] {
        &self.keys
    }

    pub fn covers(&self, keys: &[LockKey]) -> bool {
        keys.iter().all(|k| self.keys.binary_search(k).is_ok())
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        self.guards.clear();
        // A slot referenced only by the map has no holder and no waiter
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        for key in &self.keys {
            if slots.get(key).is_some_and(|s| Arc::strong_count(s) == 1) {
                slots.remove(key);
            }
        }
    }
}

#[cfg(test)]
#[path = "locks_tests.rs"]
mod tests;
