//! # kasir-store: Key-Value Persistence for Kasir POS
//!
//! The engine persists whole JSON blobs (catalog, ledger, settings)
//! under well-known string keys. This crate provides that key-value
//! surface with two backends:
//!
//! - [`SqliteStore`] - the production backend, a single `kv` table in
//!   SQLite (WAL mode, connection pool)
//! - [`MemoryStore`] - in-process HashMap for tests
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Persistence Layout                             │
//! │                                                                     │
//! │  kasir-engine                                                       │
//! │       │  get/set/delete(key, json-string)                           │
//! │       ▼                                                             │
//! │  KeyValueStore (trait)                                              │
//! │       │                                                             │
//! │       ├──► SqliteStore ──► kv(key TEXT PRIMARY KEY, value TEXT)     │
//! │       └──► MemoryStore ──► HashMap<String, String>                  │
//! │                                                                     │
//! │  Keys: products, transactions, transactionArchive,                  │
//! │        storeSettings, paymentSettings, taxSettings,                 │
//! │        lastResetDate, lastBackupDate, firstLoginDate                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Resilience Contract
//! Writes surface errors. Reads may fail too, but callers are expected
//! to degrade to defaults rather than crash; [`codec::read_or_default`]
//! packages that rule.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codec;
pub mod error;
pub mod keys;
pub mod memory;
pub mod sqlite;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, StoreConfig};

// =============================================================================
// The Store Trait
// =============================================================================

/// Async key-value storage of JSON strings.
///
/// Values are opaque here; (de)serialization lives in [`codec`] so both
/// backends stay trivial.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Reads the value stored under `key`, if any.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> StoreResult<()>;
}

/// Shared handles count as stores too, so one backend can serve
/// several engine instances (and tests can reopen the same data).
impl<S: KeyValueStore> KeyValueStore for std::sync::Arc<S> {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value).await
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key).await
    }
}
