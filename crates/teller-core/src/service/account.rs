//! Account lifecycle: creation, closure, per-user listing
//!
//! Closure rewrites the whole account record, so it holds the same
//! per-account lock the balance executors hold; an unguarded closure
//! could overwrite a concurrent balance write with a stale record.
//! Creation assigns a number no other account carries yet, so it runs
//! unguarded; uniqueness is the allocator's concern (sequential
//! successor of the highest number).

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use teller_common::{AccountStatus, INITIAL_ACCOUNT_NUMBER, TellerError, next_account_number};
use teller_lock::{LockManager, LockTarget, with_lock};
use teller_persistence::{
    AccountPersistence, AccountRecord, PersistenceService, UserPersistence,
};

use crate::settings::TellerConfig;
use crate::model::AccountInfo;

/// Names the account a closure targets for the lock wrapper
struct AccountLockKey<'a>(&'a str);

impl LockTarget for AccountLockKey<'_> {
    fn lock_key(&self) -> &str {
        self.0
    }
}

pub struct AccountService {
    persistence: Arc<dyn PersistenceService>,
    lock: Arc<LockManager>,
    max_accounts_per_user: usize,
}

impl AccountService {
    pub fn new(
        persistence: Arc<dyn PersistenceService>,
        lock: Arc<LockManager>,
        config: &TellerConfig,
    ) -> Self {
        Self {
            persistence,
            lock,
            max_accounts_per_user: config.max_accounts_per_user,
        }
    }

    /// Open a new account for `user_id` with an initial balance
    pub async fn create_account(
        &self,
        user_id: u64,
        initial_balance: i64,
    ) -> Result<AccountInfo, TellerError> {
        if initial_balance < 0 {
            return Err(TellerError::InvalidAmount(initial_balance));
        }

        self.require_user(user_id).await?;

        let count = self
            .persistence
            .account_count_by_user(user_id)
            .await
            .map_err(TellerError::storage)?;
        if count >= self.max_accounts_per_user {
            return Err(TellerError::MaxAccountsExceeded(user_id));
        }

        let account_number = match self
            .persistence
            .account_last_number()
            .await
            .map_err(TellerError::storage)?
        {
            Some(last) => next_account_number(&last)
                .ok_or_else(|| TellerError::storage(format!("malformed account number '{last}'")))?,
            None => INITIAL_ACCOUNT_NUMBER.to_string(),
        };

        let record = AccountRecord {
            id: Uuid::new_v4().to_string(),
            user_id,
            account_number,
            status: AccountStatus::InUse,
            balance: initial_balance,
            registered_at: Utc::now(),
            unregistered_at: None,
        };
        self.persistence
            .account_save(&record)
            .await
            .map_err(TellerError::storage)?;

        info!(user_id, account_number = %record.account_number, "Account created");
        Ok(AccountInfo::from(record))
    }

    /// Close an account; one-way transition to `Unregistered`
    pub async fn unregister_account(
        &self,
        user_id: u64,
        account_number: &str,
    ) -> Result<AccountInfo, TellerError> {
        self.require_user(user_id).await?;

        with_lock(&self.lock, &AccountLockKey(account_number), || {
            self.execute_unregister(user_id, account_number)
        })
        .await
    }

    async fn execute_unregister(
        &self,
        user_id: u64,
        account_number: &str,
    ) -> Result<AccountInfo, TellerError> {
        let mut account = self
            .persistence
            .account_find_by_number(account_number)
            .await
            .map_err(TellerError::storage)?
            .ok_or_else(|| TellerError::AccountNotFound(account_number.to_string()))?;

        if account.user_id != user_id {
            return Err(TellerError::UserAccountMismatch(
                account_number.to_string(),
                user_id,
            ));
        }
        if account.status == AccountStatus::Unregistered {
            return Err(TellerError::AlreadyUnregistered(account_number.to_string()));
        }
        if account.balance > 0 {
            return Err(TellerError::BalanceNotEmpty(account_number.to_string()));
        }

        account.status = AccountStatus::Unregistered;
        account.unregistered_at = Some(Utc::now());
        self.persistence
            .account_save(&account)
            .await
            .map_err(TellerError::storage)?;

        info!(user_id, account_number, "Account unregistered");
        Ok(AccountInfo::from(account))
    }

    /// All accounts owned by `user_id`
    pub async fn list_accounts(&self, user_id: u64) -> Result<Vec<AccountInfo>, TellerError> {
        self.require_user(user_id).await?;

        let accounts = self
            .persistence
            .account_find_by_user(user_id)
            .await
            .map_err(TellerError::storage)?;

        Ok(accounts.into_iter().map(AccountInfo::from).collect())
    }

    async fn require_user(&self, user_id: u64) -> Result<(), TellerError> {
        self.persistence
            .user_find_by_id(user_id)
            .await
            .map_err(TellerError::storage)?
            .ok_or(TellerError::UserNotFound(user_id))?;
        Ok(())
    }
}
