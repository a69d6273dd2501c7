// In-memory lock store with automatic expiry
// Stands in for an external shared store in standalone deployments

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};

use crate::store::LockStore;

/// A live lock entry
pub(crate) struct LockEntry {
    holder: String,
    acquired_at: Instant,
    ttl: Duration,
}

impl LockEntry {
    fn new(holder: &str, ttl: Duration) -> Self {
        Self {
            holder: holder.to_string(),
            acquired_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.acquired_at.elapsed() > self.ttl
    }
}

/// In-memory lock store using DashMap
///
/// Entries expire implicitly: an expired entry is treated as absent on
/// the next acquire attempt, and the optional background sweeper drops
/// them eagerly so the table does not grow unbounded.
pub struct MemoryLockStore {
    pub(crate) locks: Arc<DashMap<String, LockEntry>>,
}

impl Default for MemoryLockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLockStore {
    /// Create a new lock store without a background sweeper
    pub fn new() -> Self {
        Self {
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Create a new lock store and start the background expiry task
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_sweeper(sweep_interval: Duration) -> Self {
        let store = Self::new();

        let locks = store.locks.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(sweep_interval);
            loop {
                interval.tick().await;
                let expired_keys: Vec<String> = locks
                    .iter()
                    .filter(|entry| entry.value().is_expired())
                    .map(|entry| entry.key().clone())
                    .collect();

                for key in &expired_keys {
                    locks.remove(key);
                }

                if !expired_keys.is_empty() {
                    debug!(count = expired_keys.len(), "Swept expired lock entries");
                }
            }
        });

        info!("MemoryLockStore initialized with background expiry task");

        store
    }

    /// Number of live (non-expired) entries, for diagnostics
    pub fn live_count(&self) -> usize {
        self.locks
            .iter()
            .filter(|entry| !entry.value().is_expired())
            .count()
    }
}

#[async_trait]
impl LockStore for MemoryLockStore {
    async fn try_acquire(&self, key: &str, holder: &str, ttl: Duration) -> anyhow::Result<bool> {
        // The entry API holds the shard lock, so check-then-insert is atomic
        match self.locks.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let existing = occupied.get();
                if !existing.is_expired() && existing.holder != holder {
                    return Ok(false);
                }
                occupied.insert(LockEntry::new(holder, ttl));
                debug!(key = %key, holder = %holder, "Lock entry replaced");
                Ok(true)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(LockEntry::new(holder, ttl));
                debug!(key = %key, holder = %holder, "Lock entry created");
                Ok(true)
            }
        }
    }

    async fn release(&self, key: &str, holder: &str) -> anyhow::Result<bool> {
        let removed = self
            .locks
            .remove_if(key, |_, entry| entry.holder == holder);

        if removed.is_some() {
            debug!(key = %key, holder = %holder, "Lock entry deleted");
        }

        Ok(removed.is_some())
    }
}
