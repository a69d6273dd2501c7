//! Business services

pub mod account;
pub mod transaction;

pub use account::AccountService;
pub use transaction::TransactionService;
