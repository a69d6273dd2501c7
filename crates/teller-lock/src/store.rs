//! Lock store contract
//!
//! Thin abstraction over a shared, network-reachable key-value store.
//! The store primitive itself enforces that at most one live entry
//! exists per key; no application-side coordination is involved, which
//! is what makes the guarantee hold across independent processes.

use std::time::Duration;

use async_trait::async_trait;

/// Contract over the shared lock store
///
/// Implementations dispatch to the configured backend: the in-process
/// `MemoryLockStore` for standalone deployments, or any external store
/// exposing an atomic set-if-absent-with-expiry primitive.
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Atomically create the lock entry for `key` if none is live
    ///
    /// An entry whose TTL has elapsed counts as absent. Returns `true`
    /// if the entry was created (or refreshed by the same holder),
    /// `false` if the key is held by another holder.
    async fn try_acquire(&self, key: &str, holder: &str, ttl: Duration) -> anyhow::Result<bool>;

    /// Delete the lock entry for `key` if it is held by `holder`
    ///
    /// Returns `true` if an entry was deleted, `false` if the key was
    /// not held or was held by a different holder (already expired and
    /// re-acquired). The holder check prevents a caller whose lock
    /// expired from releasing somebody else's lock.
    async fn release(&self, key: &str, holder: &str) -> anyhow::Result<bool>;
}
