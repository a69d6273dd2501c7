//! User repository contract

use async_trait::async_trait;

use crate::model::UserRecord;

#[async_trait]
pub trait UserPersistence {
    /// Find a user by id
    async fn user_find_by_id(&self, user_id: u64) -> anyhow::Result<Option<UserRecord>>;

    /// Create or update a user record
    async fn user_save(&self, user: &UserRecord) -> anyhow::Result<()>;
}
