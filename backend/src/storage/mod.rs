//! # Storage
//!
//! The ledger and the footprint service talk to persistence only through the
//! [`KeyValueStorage`] trait, an explicitly injected get/set collaborator.
//! Two implementations exist: a sqlite-backed store for real runs and an
//! in-memory store for tests and ephemeral servers.

use anyhow::Result;
use async_trait::async_trait;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::DbConnection;

/// Asynchronous key-value persistence collaborator.
///
/// Object safe so services can hold an `Arc<dyn KeyValueStorage>` and the
/// backend can be swapped at startup without touching the domain layer.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Retrieve a value by its key, `None` if absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a key-value pair, overwriting any existing value
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
