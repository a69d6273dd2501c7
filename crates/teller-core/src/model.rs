//! Request and result types for the business services
//!
//! Every balance-mutating request implements `LockTarget`, exposing
//! the account number it targets; the guarded-call wrapper consumes
//! that capability generically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use teller_common::{AccountStatus, TransactionResult, TransactionType};
use teller_lock::LockTarget;
use teller_persistence::{AccountRecord, TransactionRecord};

/// Request to spend funds from an account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseBalanceRequest {
    pub user_id: u64,
    pub account_number: String,
    /// Amount in the smallest currency unit; must be positive
    pub amount: i64,
}

impl LockTarget for UseBalanceRequest {
    fn lock_key(&self) -> &str {
        &self.account_number
    }
}

/// Request to reverse a prior use of funds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBalanceRequest {
    /// The transaction being reversed; carried on the cancel record
    /// for audit, not validated against here
    pub transaction_id: String,
    pub account_number: String,
    pub amount: i64,
}

impl LockTarget for CancelBalanceRequest {
    fn lock_key(&self) -> &str {
        &self.account_number
    }
}

/// Account state returned from the lifecycle operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub user_id: u64,
    pub account_number: String,
    pub status: AccountStatus,
    pub balance: i64,
    pub registered_at: DateTime<Utc>,
    pub unregistered_at: Option<DateTime<Utc>>,
}

impl From<AccountRecord> for AccountInfo {
    fn from(record: AccountRecord) -> Self {
        Self {
            user_id: record.user_id,
            account_number: record.account_number,
            status: record.status,
            balance: record.balance,
            registered_at: record.registered_at,
            unregistered_at: record.unregistered_at,
        }
    }
}

/// Outcome of a balance mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    pub transaction_id: String,
    pub account_number: String,
    pub transaction_type: TransactionType,
    pub result: TransactionResult,
    pub amount: i64,
    pub transacted_at: DateTime<Utc>,
}

impl From<TransactionRecord> for TransactionInfo {
    fn from(record: TransactionRecord) -> Self {
        Self {
            transaction_id: record.transaction_id,
            account_number: record.account_number,
            transaction_type: record.transaction_type,
            result: record.result,
            amount: record.amount,
            transacted_at: record.transacted_at,
        }
    }
}
