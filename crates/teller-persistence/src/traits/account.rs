//! Account repository contract

use async_trait::async_trait;

use crate::model::AccountRecord;

/// Account lookups and writes
///
/// `account_save` commits the record atomically; any validation the
/// caller performed just before the save is covered by the per-account
/// lock the caller holds.
#[async_trait]
pub trait AccountPersistence {
    /// Find an account by its account number
    async fn account_find_by_number(&self, number: &str)
    -> anyhow::Result<Option<AccountRecord>>;

    /// All accounts owned by a user, ordered by account number
    async fn account_find_by_user(&self, user_id: u64) -> anyhow::Result<Vec<AccountRecord>>;

    /// Number of accounts (any status) owned by a user
    async fn account_count_by_user(&self, user_id: u64) -> anyhow::Result<usize>;

    /// Highest allocated account number, if any account exists
    async fn account_last_number(&self) -> anyhow::Result<Option<String>>;

    /// Create or update an account record
    async fn account_save(&self, account: &AccountRecord) -> anyhow::Result<()>;
}
