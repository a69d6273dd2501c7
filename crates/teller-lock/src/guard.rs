//! Guarded-call wrapper
//!
//! Brackets an operation with acquire/release of the lock named by the
//! request. Release runs on every exit path, success or business
//! error. A panic inside the operation aborts the task instead; the
//! entry's TTL reclaims the lock in that case.

use std::future::Future;

use teller_common::TellerError;

use crate::manager::LockManager;

/// Capability of a request to name the account it targets
///
/// Every lock-guarded request type implements this; the wrapper
/// consumes it generically, so the acquire/release bracketing is not
/// duplicated per call site.
pub trait LockTarget {
    /// The account number scoping mutual exclusion for this request
    fn lock_key(&self) -> &str;
}

/// Run `op` while holding the lock for the account `request` targets
///
/// If the lock cannot be acquired within the manager's timeout, the
/// `LockTimeout` propagates and `op` is never invoked. Once acquired,
/// `op` runs to completion and the lock is released before its result
/// is returned, whether that result is `Ok` or `Err`.
pub async fn with_lock<R, T, F, Fut>(
    manager: &LockManager,
    request: &R,
    op: F,
) -> Result<T, TellerError>
where
    R: LockTarget,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, TellerError>>,
{
    let handle = manager.acquire(request.lock_key()).await?;

    let result = op().await;

    manager.release(&handle).await;

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use crate::manager::LockConfig;
    use crate::memory::MemoryLockStore;

    struct FakeRequest {
        account_number: String,
    }

    impl LockTarget for FakeRequest {
        fn lock_key(&self) -> &str {
            &self.account_number
        }
    }

    fn manager() -> LockManager {
        LockManager::new(
            Arc::new(MemoryLockStore::new()),
            LockConfig {
                acquire_timeout: Duration::from_millis(200),
                poll_interval: Duration::from_millis(50),
                entry_ttl: Duration::from_secs(15),
            },
        )
    }

    #[tokio::test]
    async fn test_success_path_releases() {
        let manager = manager();
        let request = FakeRequest {
            account_number: "1000000001".to_string(),
        };

        let out = with_lock(&manager, &request, || async { Ok(42) }).await.unwrap();
        assert_eq!(out, 42);

        // Lock is free again
        let handle = manager.acquire("1000000001").await.unwrap();
        manager.release(&handle).await;
    }

    #[tokio::test]
    async fn test_error_path_releases() {
        let manager = manager();
        let request = FakeRequest {
            account_number: "1000000001".to_string(),
        };

        let err = with_lock(&manager, &request, || async {
            Err::<(), _>(TellerError::InvalidAmount(-1))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, TellerError::InvalidAmount(-1)));

        // The failing operation did not leak the lock
        let handle = manager.acquire("1000000001").await.unwrap();
        manager.release(&handle).await;
    }

    #[tokio::test]
    async fn test_timeout_skips_operation() {
        let manager = manager();
        let request = FakeRequest {
            account_number: "1000000001".to_string(),
        };

        let _held = manager.acquire("1000000001").await.unwrap();

        let invoked = Arc::new(AtomicBool::new(false));
        let invoked_in_op = invoked.clone();
        let err = with_lock(&manager, &request, move || async move {
            invoked_in_op.store(true, Ordering::SeqCst);
            Ok(())
        })
        .await
        .unwrap_err();

        assert!(matches!(err, TellerError::LockTimeout(_)));
        assert!(!invoked.load(Ordering::SeqCst));
    }
}
