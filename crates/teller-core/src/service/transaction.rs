//! Balance operations, executed under the per-account lock
//!
//! `use_balance` and `cancel_balance` are the guarded operations: the
//! wrapper acquires the lock named by the request before the executor
//! runs, and releases it on every exit path. The executors themselves
//! never touch the lock; they assume serialized access to the account
//! record and perform a single read-validate-write.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use teller_common::{AccountStatus, TellerError, TransactionResult, TransactionType};
use teller_lock::{LockManager, with_lock};
use teller_persistence::{
    AccountPersistence, AccountRecord, PersistenceService, TransactionPersistence,
    TransactionRecord, UserPersistence,
};

use crate::model::{CancelBalanceRequest, TransactionInfo, UseBalanceRequest};

pub struct TransactionService {
    persistence: Arc<dyn PersistenceService>,
    lock: Arc<LockManager>,
}

impl TransactionService {
    pub fn new(persistence: Arc<dyn PersistenceService>, lock: Arc<LockManager>) -> Self {
        Self { persistence, lock }
    }

    /// Spend funds from the account the request targets
    pub async fn use_balance(
        &self,
        request: &UseBalanceRequest,
    ) -> Result<TransactionInfo, TellerError> {
        with_lock(&self.lock, request, || self.execute_use_balance(request)).await
    }

    /// Reverse a prior use of funds on the account the request targets
    pub async fn cancel_balance(
        &self,
        request: &CancelBalanceRequest,
    ) -> Result<TransactionInfo, TellerError> {
        with_lock(&self.lock, request, || self.execute_cancel_balance(request)).await
    }

    async fn execute_use_balance(
        &self,
        request: &UseBalanceRequest,
    ) -> Result<TransactionInfo, TellerError> {
        if request.amount <= 0 {
            return Err(TellerError::InvalidAmount(request.amount));
        }

        self.persistence
            .user_find_by_id(request.user_id)
            .await
            .map_err(TellerError::storage)?
            .ok_or(TellerError::UserNotFound(request.user_id))?;

        let mut account = self.find_account(&request.account_number).await?;

        if account.user_id != request.user_id {
            return Err(TellerError::UserAccountMismatch(
                request.account_number.clone(),
                request.user_id,
            ));
        }
        if account.status == AccountStatus::Unregistered {
            return Err(TellerError::AlreadyUnregistered(
                request.account_number.clone(),
            ));
        }

        if request.amount > account.balance {
            warn!(
                account_number = %account.account_number,
                amount = request.amount,
                balance = account.balance,
                "Use rejected: amount exceeds balance"
            );
            // Record the rejected attempt; the balance is untouched
            if let Err(record_err) = self
                .record(&account, TransactionType::Use, TransactionResult::Failure, request.amount, None)
                .await
            {
                warn!(
                    account_number = %account.account_number,
                    error = %record_err,
                    "Failed to persist rejected-use record"
                );
            }
            return Err(TellerError::AmountExceedsBalance {
                account_number: account.account_number,
                amount: request.amount,
                balance: account.balance,
            });
        }

        account.balance -= request.amount;
        self.persistence
            .account_save(&account)
            .await
            .map_err(TellerError::storage)?;

        let record = self
            .record(&account, TransactionType::Use, TransactionResult::Success, request.amount, None)
            .await?;

        info!(
            account_number = %account.account_number,
            amount = request.amount,
            balance = account.balance,
            transaction_id = %record.transaction_id,
            "Balance used"
        );
        Ok(TransactionInfo::from(record))
    }

    async fn execute_cancel_balance(
        &self,
        request: &CancelBalanceRequest,
    ) -> Result<TransactionInfo, TellerError> {
        if request.amount < 0 {
            return Err(TellerError::InvalidAmount(request.amount));
        }

        let mut account = self.find_account(&request.account_number).await?;

        if account.status == AccountStatus::Unregistered {
            return Err(TellerError::AlreadyUnregistered(
                request.account_number.clone(),
            ));
        }

        account.balance = account
            .balance
            .checked_add(request.amount)
            .ok_or(TellerError::InvalidAmount(request.amount))?;
        self.persistence
            .account_save(&account)
            .await
            .map_err(TellerError::storage)?;

        let record = self
            .record(
                &account,
                TransactionType::Cancel,
                TransactionResult::Success,
                request.amount,
                Some(request.transaction_id.clone()),
            )
            .await?;

        info!(
            account_number = %account.account_number,
            amount = request.amount,
            balance = account.balance,
            transaction_id = %record.transaction_id,
            "Balance use cancelled"
        );
        Ok(TransactionInfo::from(record))
    }

    async fn find_account(&self, account_number: &str) -> Result<AccountRecord, TellerError> {
        self.persistence
            .account_find_by_number(account_number)
            .await
            .map_err(TellerError::storage)?
            .ok_or_else(|| TellerError::AccountNotFound(account_number.to_string()))
    }

    /// Append a transaction record reflecting the (attempted) mutation
    async fn record(
        &self,
        account: &AccountRecord,
        transaction_type: TransactionType,
        result: TransactionResult,
        amount: i64,
        related_transaction_id: Option<String>,
    ) -> Result<TransactionRecord, TellerError> {
        let record = TransactionRecord {
            transaction_id: Uuid::new_v4().simple().to_string(),
            related_transaction_id,
            account_number: account.account_number.clone(),
            transaction_type,
            result,
            amount,
            balance_snapshot: account.balance,
            transacted_at: Utc::now(),
        };
        self.persistence
            .transaction_save(&record)
            .await
            .map_err(TellerError::storage)?;
        Ok(record)
    }
}
