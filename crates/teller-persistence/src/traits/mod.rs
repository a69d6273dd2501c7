//! Persistence traits for the storage abstraction layer
//!
//! Each concern (accounts, users, transactions) gets its own trait;
//! `PersistenceService` bundles them into the single interface the
//! business services consume. Implementations dispatch to the
//! configured storage backend.

pub mod account;
pub mod transaction;
pub mod user;

pub use account::AccountPersistence;
pub use transaction::TransactionPersistence;
pub use user::UserPersistence;

use async_trait::async_trait;

use crate::model::StorageMode;

/// Unified persistence service trait
#[async_trait]
pub trait PersistenceService:
    AccountPersistence + UserPersistence + TransactionPersistence + Send + Sync
{
    /// Get the current storage mode
    fn storage_mode(&self) -> StorageMode;

    /// Health check for the storage backend
    async fn health_check(&self) -> anyhow::Result<()>;
}
