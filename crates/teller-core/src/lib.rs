//! Teller Core - Account lifecycle and lock-guarded balance operations
//!
//! Business services over the persistence and lock crates:
//! - `AccountService`: creation, closure, per-user listing
//! - `TransactionService`: use/cancel of funds, executed under the
//!   per-account distributed lock with a transaction record per
//!   mutation
//!
//! HTTP wiring, request validation, and DTO mapping for a wire surface
//! belong to the surrounding application layer, not to this crate.


pub mod model;
pub mod settings;
pub mod service;

pub use settings::TellerConfig;
pub use model::{AccountInfo, CancelBalanceRequest, TransactionInfo, UseBalanceRequest};
pub use service::account::AccountService;
pub use service::transaction::TransactionService;
