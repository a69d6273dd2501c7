// Embedded persistence backend using RocksDB
// Provides standalone (single-node) storage without an external database

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rocksdb::{DB, IteratorMode, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::model::{AccountRecord, StorageMode, TransactionRecord, UserRecord};
use crate::traits::PersistenceService;
use crate::traits::account::AccountPersistence;
use crate::traits::transaction::TransactionPersistence;
use crate::traits::user::UserPersistence;

/// Column family for account records, keyed by account number
pub const CF_ACCOUNTS: &str = "accounts";
/// Column family for user records, keyed by decimal user id
pub const CF_USERS: &str = "users";
/// Column family for transaction records, keyed by transaction id
pub const CF_TRANSACTIONS: &str = "transactions";

/// Standalone embedded persistence using RocksDB
///
/// Records are stored as JSON values. Account numbers are fixed-length
/// numeric strings, so key order in the accounts column family is also
/// numeric order.
pub struct EmbeddedPersistService {
    db: Arc<DB>,
}

impl EmbeddedPersistService {
    /// Open (or create) the database at `path`
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let db = DB::open_cf(&opts, path, [CF_ACCOUNTS, CF_USERS, CF_TRANSACTIONS])?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Create from an already-opened RocksDB instance
    pub fn new(db: Arc<DB>) -> Self {
        Self { db }
    }

    /// Get a column family handle
    fn cf(&self, name: &str) -> anyhow::Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| anyhow::anyhow!("Column family '{}' not found", name))
    }

    /// Write a record as JSON to a column family
    fn put_record<T: Serialize>(&self, cf_name: &str, key: &str, value: &T) -> anyhow::Result<()> {
        let cf = self.cf(cf_name)?;
        self.db
            .put_cf(cf, key.as_bytes(), serde_json::to_vec(value)?)
            .map_err(|e| anyhow::anyhow!("RocksDB put error: {}", e))
    }

    /// Read a JSON record from a column family
    fn get_record<T: DeserializeOwned>(
        &self,
        cf_name: &str,
        key: &str,
    ) -> anyhow::Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, key.as_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    /// Scan all account records, applying `filter`
    fn scan_accounts(
        &self,
        filter: impl Fn(&AccountRecord) -> bool,
    ) -> anyhow::Result<Vec<AccountRecord>> {
        let cf = self.cf(CF_ACCOUNTS)?;
        let mut accounts = Vec::new();

        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_, value) = item?;
            let account: AccountRecord = serde_json::from_slice(&value)?;
            if filter(&account) {
                accounts.push(account);
            }
        }

        Ok(accounts)
    }
}

#[async_trait]
impl AccountPersistence for EmbeddedPersistService {
    async fn account_find_by_number(
        &self,
        number: &str,
    ) -> anyhow::Result<Option<AccountRecord>> {
        self.get_record(CF_ACCOUNTS, number)
    }

    async fn account_find_by_user(&self, user_id: u64) -> anyhow::Result<Vec<AccountRecord>> {
        // Keys are fixed-length numeric strings: scan order is account-number order
        self.scan_accounts(|account| account.user_id == user_id)
    }

    async fn account_count_by_user(&self, user_id: u64) -> anyhow::Result<usize> {
        Ok(self.scan_accounts(|account| account.user_id == user_id)?.len())
    }

    async fn account_last_number(&self) -> anyhow::Result<Option<String>> {
        let cf = self.cf(CF_ACCOUNTS)?;
        match self.db.iterator_cf(cf, IteratorMode::End).next() {
            Some(item) => {
                let (key, _) = item?;
                Ok(Some(String::from_utf8(key.to_vec())?))
            }
            None => Ok(None),
        }
    }

    async fn account_save(&self, account: &AccountRecord) -> anyhow::Result<()> {
        self.put_record(CF_ACCOUNTS, &account.account_number, account)
    }
}

#[async_trait]
impl UserPersistence for EmbeddedPersistService {
    async fn user_find_by_id(&self, user_id: u64) -> anyhow::Result<Option<UserRecord>> {
        self.get_record(CF_USERS, &user_id.to_string())
    }

    async fn user_save(&self, user: &UserRecord) -> anyhow::Result<()> {
        self.put_record(CF_USERS, &user.id.to_string(), user)
    }
}

#[async_trait]
impl TransactionPersistence for EmbeddedPersistService {
    async fn transaction_find_by_id(
        &self,
        transaction_id: &str,
    ) -> anyhow::Result<Option<TransactionRecord>> {
        self.get_record(CF_TRANSACTIONS, transaction_id)
    }

    async fn transaction_find_by_account(
        &self,
        account_number: &str,
    ) -> anyhow::Result<Vec<TransactionRecord>> {
        let cf = self.cf(CF_TRANSACTIONS)?;
        let mut transactions = Vec::new();

        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_, value) = item?;
            let transaction: TransactionRecord = serde_json::from_slice(&value)?;
            if transaction.account_number == account_number {
                transactions.push(transaction);
            }
        }

        // Keys are random ids, so key order carries no meaning
        transactions.sort_by_key(|t| t.transacted_at);
        Ok(transactions)
    }

    async fn transaction_save(&self, transaction: &TransactionRecord) -> anyhow::Result<()> {
        self.put_record(CF_TRANSACTIONS, &transaction.transaction_id, transaction)
    }
}

#[async_trait]
impl PersistenceService for EmbeddedPersistService {
    fn storage_mode(&self) -> StorageMode {
        StorageMode::StandaloneEmbedded
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        // All column families must be present
        self.cf(CF_ACCOUNTS)?;
        self.cf(CF_USERS)?;
        self.cf(CF_TRANSACTIONS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use tempfile::TempDir;

    use teller_common::{AccountStatus, TransactionResult, TransactionType};

    fn account(user_id: u64, number: &str, balance: i64) -> AccountRecord {
        AccountRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            account_number: number.to_string(),
            status: AccountStatus::InUse,
            balance,
            registered_at: Utc::now(),
            unregistered_at: None,
        }
    }

    fn service() -> (TempDir, EmbeddedPersistService) {
        let dir = TempDir::new().unwrap();
        let svc = EmbeddedPersistService::open(dir.path()).unwrap();
        (dir, svc)
    }

    #[tokio::test]
    async fn test_account_roundtrip() {
        let (_dir, svc) = service();

        svc.account_save(&account(1, "1000000000", 1000)).await.unwrap();

        let found = svc
            .account_find_by_number("1000000000")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.user_id, 1);
        assert_eq!(found.balance, 1000);
        assert_eq!(found.status, AccountStatus::InUse);

        assert!(svc.account_find_by_number("9999999999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let (_dir, svc) = service();

        let mut record = account(1, "1000000000", 1000);
        svc.account_save(&record).await.unwrap();

        record.balance = 800;
        svc.account_save(&record).await.unwrap();

        let found = svc
            .account_find_by_number("1000000000")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.balance, 800);
    }

    #[tokio::test]
    async fn test_find_and_count_by_user() {
        let (_dir, svc) = service();

        svc.account_save(&account(1, "1000000000", 0)).await.unwrap();
        svc.account_save(&account(2, "1000000001", 0)).await.unwrap();
        svc.account_save(&account(1, "1000000002", 0)).await.unwrap();

        let accounts = svc.account_find_by_user(1).await.unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].account_number, "1000000000");
        assert_eq!(accounts[1].account_number, "1000000002");

        assert_eq!(svc.account_count_by_user(1).await.unwrap(), 2);
        assert_eq!(svc.account_count_by_user(3).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_last_account_number() {
        let (_dir, svc) = service();

        assert!(svc.account_last_number().await.unwrap().is_none());

        svc.account_save(&account(1, "1000000000", 0)).await.unwrap();
        svc.account_save(&account(1, "1000000011", 0)).await.unwrap();
        svc.account_save(&account(1, "1000000002", 0)).await.unwrap();

        assert_eq!(
            svc.account_last_number().await.unwrap().as_deref(),
            Some("1000000011")
        );
    }

    #[tokio::test]
    async fn test_user_roundtrip() {
        let (_dir, svc) = service();

        svc.user_save(&UserRecord {
            id: 7,
            name: "Pobi".to_string(),
        })
        .await
        .unwrap();

        let user = svc.user_find_by_id(7).await.unwrap().unwrap();
        assert_eq!(user.name, "Pobi");
        assert!(svc.user_find_by_id(8).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_transaction_roundtrip() {
        let (_dir, svc) = service();

        let tx = TransactionRecord {
            transaction_id: "f0b9a6e4".to_string(),
            related_transaction_id: None,
            account_number: "1000000000".to_string(),
            transaction_type: TransactionType::Use,
            result: TransactionResult::Success,
            amount: 200,
            balance_snapshot: 800,
            transacted_at: Utc::now(),
        };
        svc.transaction_save(&tx).await.unwrap();

        let found = svc.transaction_find_by_id("f0b9a6e4").await.unwrap().unwrap();
        assert_eq!(found.transaction_type, TransactionType::Use);
        assert_eq!(found.amount, 200);
        assert_eq!(found.balance_snapshot, 800);
    }

    #[tokio::test]
    async fn test_transaction_find_by_account() {
        let (_dir, svc) = service();

        let base = Utc::now();
        for (id, number, minutes_ago) in [
            ("aaa", "1000000000", 5),
            ("bbb", "1000000001", 3),
            ("ccc", "1000000000", 1),
        ] {
            svc.transaction_save(&TransactionRecord {
                transaction_id: id.to_string(),
                related_transaction_id: None,
                account_number: number.to_string(),
                transaction_type: TransactionType::Use,
                result: TransactionResult::Success,
                amount: 100,
                balance_snapshot: 0,
                transacted_at: base - chrono::Duration::minutes(minutes_ago),
            })
            .await
            .unwrap();
        }

        let history = svc.transaction_find_by_account("1000000000").await.unwrap();
        assert_eq!(history.len(), 2);
        // Oldest first, regardless of id order
        assert_eq!(history[0].transaction_id, "aaa");
        assert_eq!(history[1].transaction_id, "ccc");

        assert!(svc.transaction_find_by_account("9999999999").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health_check() {
        let (_dir, svc) = service();
        svc.health_check().await.unwrap();
        assert_eq!(svc.storage_mode(), StorageMode::StandaloneEmbedded);
    }
}
