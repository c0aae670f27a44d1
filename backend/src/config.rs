//! Startup configuration.
//!
//! Everything is selected explicitly from the environment at startup: which
//! storage backend the ledger runs on, where the sqlite database lives, and
//! where the server binds. No ambient or static state.

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::str::FromStr;

const DEFAULT_DATABASE_URL: &str = "sqlite:greenledger.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Persistence backend for the ledger's key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// sqlite `key_values` table on disk
    Sqlite,
    /// process-local map, lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!("unknown storage backend: {other} (expected \"sqlite\" or \"memory\")"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub database_url: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Read configuration from `GREENLEDGER_*` environment variables,
    /// falling back to local-development defaults.
    pub fn from_env() -> Result<Self> {
        let storage = std::env::var("GREENLEDGER_STORAGE")
            .unwrap_or_else(|_| "sqlite".to_string())
            .parse()?;
        let database_url = std::env::var("GREENLEDGER_DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let bind_addr = std::env::var("GREENLEDGER_BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("invalid GREENLEDGER_BIND_ADDR")?;

        Ok(Self {
            storage,
            database_url,
            bind_addr,
        })
    }
}
