//! Teller Lock - Per-account distributed locking
//!
//! This crate provides the mutual-exclusion core that serializes
//! balance-mutating operations on the same account across independent
//! service processes:
//! - `LockStore`: contract over a shared key-value store with atomic
//!   set-if-absent-with-expiry and holder-verified delete
//! - `MemoryLockStore`: in-process store backed by a `DashMap`,
//!   standing in for an external shared store in standalone mode
//! - `LockManager`: bounded-retry acquire with a timeout, idempotent
//!   release
//! - `with_lock`: guarded-call wrapper that brackets an operation with
//!   acquire/release on every exit path

pub mod guard;
pub mod manager;
pub mod memory;
pub mod store;

pub use guard::{LockTarget, with_lock};
pub use manager::{LockConfig, LockHandle, LockManager};
pub use memory::MemoryLockStore;
pub use store::LockStore;
