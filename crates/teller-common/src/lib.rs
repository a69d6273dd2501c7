//! Teller Common - Shared types and error taxonomy
//!
//! This crate provides the foundational types used across all Teller
//! components:
//! - Error types and error codes
//! - Domain enums (account status, transaction type/result)
//! - Account number validation helpers

pub mod error;

// Re-exports for convenience
pub use error::{ErrorCode, TellerError};

/// Fixed length of an account number
pub const ACCOUNT_NUMBER_LEN: usize = 10;

/// First account number handed out when none exist yet
pub const INITIAL_ACCOUNT_NUMBER: &str = "1000000000";

/// Maximum number of open accounts a single user may hold
pub const MAX_ACCOUNTS_PER_USER: usize = 10;

/// Lifecycle status of an account
///
/// The only permitted transition is `InUse` -> `Unregistered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum AccountStatus {
    #[default]
    #[serde(rename = "IN_USE")]
    InUse,
    #[serde(rename = "UNREGISTERED")]
    Unregistered,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::InUse => "IN_USE",
            AccountStatus::Unregistered => "UNREGISTERED",
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_USE" => Ok(AccountStatus::InUse),
            "UNREGISTERED" => Ok(AccountStatus::Unregistered),
            _ => Err(format!("Invalid account status: {}", s)),
        }
    }
}

/// Kind of balance mutation a transaction records
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TransactionType {
    #[serde(rename = "USE")]
    Use,
    #[serde(rename = "CANCEL")]
    Cancel,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Use => "USE",
            TransactionType::Cancel => "CANCEL",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USE" => Ok(TransactionType::Use),
            "CANCEL" => Ok(TransactionType::Cancel),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

/// Outcome recorded on a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TransactionResult {
    #[serde(rename = "S")]
    Success,
    #[serde(rename = "F")]
    Failure,
}

impl TransactionResult {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionResult::Success => "S",
            TransactionResult::Failure => "F",
        }
    }
}

impl std::fmt::Display for TransactionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validate an account number: fixed length, digits only
///
/// # Examples
///
/// ```
/// use teller_common::is_valid_account_number;
///
/// assert!(is_valid_account_number("1000000012"));
/// assert!(!is_valid_account_number("100"));
/// assert!(!is_valid_account_number("10000000ab"));
/// ```
pub fn is_valid_account_number(number: &str) -> bool {
    number.len() == ACCOUNT_NUMBER_LEN && number.bytes().all(|b| b.is_ascii_digit())
}

/// Numeric successor of an account number, zero-padded to the fixed length
///
/// Allocation is sequential: the next number is the highest allocated
/// number plus one.
pub fn next_account_number(last: &str) -> Option<String> {
    let n: u64 = last.parse().ok()?;
    Some(format!("{:0width$}", n + 1, width = ACCOUNT_NUMBER_LEN))
}
