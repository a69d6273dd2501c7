//! Lock manager: bounded-retry acquire and idempotent release
//!
//! Acquisition polls the store's set-if-absent primitive at a fixed
//! interval until the configured timeout elapses. A failed acquire
//! leaves no entry behind. Entries carry a TTL strictly longer than
//! the expected duration of the guarded operation, so a lock cannot
//! expire while still logically held.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use teller_common::TellerError;

use crate::store::LockStore;

/// Timing parameters for lock acquisition
#[derive(Debug, Clone)]
pub struct LockConfig {
    /// How long an acquire attempt may keep polling before failing
    pub acquire_timeout: Duration,
    /// Interval between set-if-absent attempts
    pub poll_interval: Duration,
    /// TTL stamped on each created entry
    pub entry_ttl: Duration,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            acquire_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(100),
            entry_ttl: Duration::from_secs(15),
        }
    }
}

/// Token returned by a successful acquire, required to release
#[derive(Debug)]
pub struct LockHandle {
    key: String,
    holder: String,
    acquired_at: Instant,
}

impl LockHandle {
    /// The key this handle locks
    pub fn key(&self) -> &str {
        &self.key
    }

    /// How long the lock has been held
    pub fn held_for(&self) -> Duration {
        self.acquired_at.elapsed()
    }
}

/// Acquires and releases named locks against a shared store
pub struct LockManager {
    store: Arc<dyn LockStore>,
    config: LockConfig,
}

impl LockManager {
    pub fn new(store: Arc<dyn LockStore>, config: LockConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    /// Acquire the lock for `key` within the configured timeout
    pub async fn acquire(&self, key: &str) -> Result<LockHandle, TellerError> {
        self.acquire_with_timeout(key, self.config.acquire_timeout)
            .await
    }

    /// Acquire the lock for `key`, polling until `timeout` elapses
    ///
    /// Each call uses a fresh holder token, so two acquire attempts by
    /// the same process still contend like independent callers. Fails
    /// with `LockTimeout` if the key stays held past the deadline; no
    /// partial acquisition is left behind.
    pub async fn acquire_with_timeout(
        &self,
        key: &str,
        timeout: Duration,
    ) -> Result<LockHandle, TellerError> {
        let holder = Uuid::new_v4().to_string();
        let started = Instant::now();
        let deadline = started + timeout;

        loop {
            let acquired = self
                .store
                .try_acquire(key, &holder, self.config.entry_ttl)
                .await
                .map_err(TellerError::storage)?;

            if acquired {
                debug!(key = %key, holder = %holder, waited_ms = started.elapsed().as_millis() as u64, "Lock acquired");
                return Ok(LockHandle {
                    key: key.to_string(),
                    holder,
                    acquired_at: Instant::now(),
                });
            }

            let now = Instant::now();
            if now >= deadline {
                warn!(key = %key, timeout_ms = timeout.as_millis() as u64, "Lock acquisition timed out");
                return Err(TellerError::LockTimeout(key.to_string()));
            }

            tokio::time::sleep(self.config.poll_interval.min(deadline - now)).await;
        }
    }

    /// Release an acquired lock
    ///
    /// Idempotent: releasing a lock that already expired (and was
    /// possibly re-acquired by another holder) is a no-op, not an
    /// error. The store refuses the delete unless the holder matches.
    pub async fn release(&self, handle: &LockHandle) {
        match self.store.release(&handle.key, &handle.holder).await {
            Ok(true) => {
                debug!(key = %handle.key, held_ms = handle.held_for().as_millis() as u64, "Lock released")
            }
            Ok(false) => {
                debug!(key = %handle.key, "Lock already released or expired")
            }
            Err(err) => {
                warn!(key = %handle.key, error = %err, "Failed to release lock; TTL will reclaim it")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::memory::MemoryLockStore;

    fn manager() -> LockManager {
        LockManager::new(
            Arc::new(MemoryLockStore::new()),
            LockConfig {
                acquire_timeout: Duration::from_millis(500),
                poll_interval: Duration::from_millis(100),
                entry_ttl: Duration::from_secs(15),
            },
        )
    }

    #[tokio::test]
    async fn test_acquire_release_reacquire() {
        let manager = manager();

        let handle = manager.acquire("1000000001").await.unwrap();
        manager.release(&handle).await;

        // Immediately acquirable again
        let handle = manager.acquire("1000000001").await.unwrap();
        assert_eq!(handle.key(), "1000000001");
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let manager = manager();

        let handle = manager.acquire("1000000001").await.unwrap();
        manager.release(&handle).await;
        // Second release of the same handle is a no-op
        manager.release(&handle).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_when_held() {
        let manager = manager();

        let _held = manager.acquire("1000000001").await.unwrap();

        let started = Instant::now();
        let err = manager
            .acquire_with_timeout("1000000001", Duration::from_millis(100))
            .await
            .unwrap_err();

        assert!(matches!(err, TellerError::LockTimeout(ref key) if key == "1000000001"));
        // Deadline respected under the paused clock
        assert_eq!(started.elapsed(), Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_different_keys_do_not_contend() {
        let manager = manager();

        let a = manager.acquire("1000000001").await.unwrap();
        let b = manager.acquire("1000000002").await.unwrap();
        manager.release(&a).await;
        manager.release(&b).await;
    }
}
