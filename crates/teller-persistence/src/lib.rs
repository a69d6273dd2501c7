//! Teller Persistence - Repository contracts and storage backends
//!
//! This crate defines the persistence traits the business services
//! depend on, decoupled from any specific storage engine, plus the
//! standalone embedded backend (RocksDB). Balance mutations performed
//! through these traits rely on the caller holding the per-account
//! lock; the backend itself only guarantees that a single `save`
//! commits atomically.

pub mod embedded;
pub mod model;
pub mod traits;

pub use embedded::EmbeddedPersistService;
pub use model::{AccountRecord, StorageMode, TransactionRecord, UserRecord};
pub use traits::{
    AccountPersistence, PersistenceService, TransactionPersistence, UserPersistence,
};
