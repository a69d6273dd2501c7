//! Transaction record repository contract

use async_trait::async_trait;

use crate::model::TransactionRecord;

#[async_trait]
pub trait TransactionPersistence {
    /// Find a transaction by its id
    async fn transaction_find_by_id(
        &self,
        transaction_id: &str,
    ) -> anyhow::Result<Option<TransactionRecord>>;

    /// All transactions recorded against an account, oldest first
    async fn transaction_find_by_account(
        &self,
        account_number: &str,
    ) -> anyhow::Result<Vec<TransactionRecord>>;

    /// Append a transaction record
    async fn transaction_save(&self, transaction: &TransactionRecord) -> anyhow::Result<()>;
}
