//! Storage record types for the persistence abstraction layer
//!
//! These types are used as arguments and return values of the
//! persistence traits, decoupled from specific storage backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use teller_common::{AccountStatus, TransactionResult, TransactionType};

/// Persisted account state
///
/// Invariants maintained by the services writing these records:
/// `balance >= 0` always, and `status == Unregistered` implies
/// `balance == 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    /// Internal identifier, assigned at creation
    pub id: String,
    /// Owning user
    pub user_id: u64,
    /// Externally unique, fixed-length account number
    pub account_number: String,
    pub status: AccountStatus,
    /// Balance in the smallest currency unit
    pub balance: i64,
    pub registered_at: DateTime<Utc>,
    pub unregistered_at: Option<DateTime<Utc>>,
}

/// Persisted account-owning user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: u64,
    pub name: String,
}

/// Persisted record of a balance mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub transaction_id: String,
    /// For cancels, the transaction being reversed; audit only
    pub related_transaction_id: Option<String>,
    pub account_number: String,
    pub transaction_type: TransactionType,
    pub result: TransactionResult,
    pub amount: i64,
    /// Account balance after the mutation (or unchanged on failure)
    pub balance_snapshot: i64,
    pub transacted_at: DateTime<Utc>,
}

/// Storage mode for the persistence layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageMode {
    /// Standalone embedded RocksDB (single node, no external database)
    StandaloneEmbedded,
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageMode::StandaloneEmbedded => write!(f, "standalone_embedded"),
        }
    }
}
