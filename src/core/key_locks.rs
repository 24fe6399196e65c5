//! Per-name locking
//!
//! Serializes cache operations that touch the same employee name. Multi-key
//! operations lock every key they touch, always in sorted order.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Table of async locks keyed by employee name
#[derive(Debug, Default)]
pub struct KeyLocks {
    table: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

/// Holds the locks for a set of names until dropped
#[derive(Debug)]
pub struct KeyGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl KeyLocks {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock every name in `keys`
    ///
    /// Duplicates are collapsed and locks are taken in sorted order, so two
    /// callers locking overlapping sets cannot deadlock.
    pub async fn lock<I, S>(&self, keys: I) -> KeyGuard
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: BTreeSet<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();

        let locks: Vec<Arc<Mutex<()>>> = {
            let mut table = self.table.lock().await;
            // Entries only the table references are idle
            table.retain(|_, lock| Arc::strong_count(lock) > 1);
            keys.iter()
                .map(|key| table.entry(key.clone()).or_default().clone())
                .collect()
        };

        let mut guards = Vec::with_capacity(locks.len());
        for lock in locks {
            guards.push(lock.lock_owned().await);
        }

        tracing::trace!("Locked {:?}", keys);
        KeyGuard { _guards: guards }
    }
}
