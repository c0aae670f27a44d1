//! # greenledger backend
//!
//! Service crate for the greenledger carbon-offset store: a footprint
//! estimator, a key-value-backed tree ledger, and an axum REST surface
//! exposing the same contract a remote backend would serve.

pub mod config;
pub mod domain;
pub mod rest;
pub mod storage;

// Re-export commonly used types
pub use domain::store::{LedgerStore, TreeStore};
pub use storage::{DbConnection, KeyValueStorage, MemoryStore};
