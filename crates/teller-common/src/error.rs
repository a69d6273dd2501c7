//! Error types and error codes for Teller
//!
//! This module defines:
//! - `TellerError`: Application-specific error enum
//! - `ErrorCode`: Structured error codes for API responses
//!
//! Business-rule failures are detected before any mutation and carry a
//! stable code plus a human-readable message. Lock failures are kept
//! distinct so callers can retry on `LockTimeout` without blindly
//! retrying business-rule errors.

use serde::{Deserialize, Serialize};

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum TellerError {
    #[error("failed to acquire lock on account '{0}' within the timeout")]
    LockTimeout(String),

    #[error("amount {amount} exceeds balance {balance} on account '{account_number}'")]
    AmountExceedsBalance {
        account_number: String,
        amount: i64,
        balance: i64,
    },

    #[error("invalid amount: {0}")]
    InvalidAmount(i64),

    #[error("account '{0}' not found")]
    AccountNotFound(String),

    #[error("user '{0}' not found")]
    UserNotFound(u64),

    #[error("account '{0}' does not belong to user '{1}'")]
    UserAccountMismatch(String, u64),

    #[error("account '{0}' is already unregistered")]
    AlreadyUnregistered(String),

    #[error("account '{0}' still holds a balance")]
    BalanceNotEmpty(String),

    #[error("user '{0}' already holds the maximum number of accounts")]
    MaxAccountsExceeded(u64),

    #[error("storage error: {0}")]
    Storage(String),
}

impl TellerError {
    /// Stable error code for this error
    pub fn code(&self) -> ErrorCode<'static> {
        match self {
            TellerError::LockTimeout(_) => LOCK_TIMEOUT,
            TellerError::AmountExceedsBalance { .. } => AMOUNT_EXCEEDS_BALANCE,
            TellerError::InvalidAmount(_) => INVALID_AMOUNT,
            TellerError::AccountNotFound(_) => ACCOUNT_NOT_FOUND,
            TellerError::UserNotFound(_) => USER_NOT_FOUND,
            TellerError::UserAccountMismatch(_, _) => USER_ACCOUNT_MISMATCH,
            TellerError::AlreadyUnregistered(_) => ACCOUNT_ALREADY_UNREGISTERED,
            TellerError::BalanceNotEmpty(_) => BALANCE_NOT_EMPTY,
            TellerError::MaxAccountsExceeded(_) => MAX_ACCOUNT_PER_USER,
            TellerError::Storage(_) => STORAGE_ERROR,
        }
    }

    /// Whether a caller may retry the same request unchanged
    ///
    /// Only lock acquisition timeouts are retryable; business-rule
    /// failures require changed input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TellerError::LockTimeout(_))
    }

    /// Wrap an infrastructure failure from the persistence layer
    pub fn storage(err: impl std::fmt::Display) -> Self {
        TellerError::Storage(err.to_string())
    }
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

pub const SUCCESS: ErrorCode<'static> = ErrorCode {
    code: 0,
    message: "success",
};

// Lock errors (retryable)
pub const LOCK_TIMEOUT: ErrorCode<'static> = ErrorCode {
    code: 10001,
    message: "could not acquire account lock",
};

// Business-rule errors
pub const AMOUNT_EXCEEDS_BALANCE: ErrorCode<'static> = ErrorCode {
    code: 20001,
    message: "amount exceeds balance",
};

pub const INVALID_AMOUNT: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "invalid amount",
};

pub const ACCOUNT_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20003,
    message: "account not found",
};

pub const USER_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20004,
    message: "user not found",
};

pub const USER_ACCOUNT_MISMATCH: ErrorCode<'static> = ErrorCode {
    code: 20005,
    message: "account does not belong to user",
};

pub const ACCOUNT_ALREADY_UNREGISTERED: ErrorCode<'static> = ErrorCode {
    code: 20006,
    message: "account already unregistered",
};

pub const BALANCE_NOT_EMPTY: ErrorCode<'static> = ErrorCode {
    code: 20007,
    message: "balance not empty",
};

pub const MAX_ACCOUNT_PER_USER: ErrorCode<'static> = ErrorCode {
    code: 20008,
    message: "maximum accounts per user reached",
};

// Infrastructure errors
pub const STORAGE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "storage error",
};
