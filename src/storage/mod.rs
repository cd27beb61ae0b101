//! # Persistence Contract
//!
//! The collection is stored through [`KeyValueStore`]: a set of short string ids
//! under one namespaced key. Implementations hand out owned copies and take
//! borrowed sets, so no caller ever holds a mutable alias of what is stored.
//!
//! Writes go through a [`PersistWriter`] task so callers never wait on storage.

pub mod json_file;
pub mod memory;
pub mod writer;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use writer::{create_persist_system, PersistHandle, PersistWriter};

use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage format error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Key-value persistence for sets of string ids.
pub trait KeyValueStore: Send + Sync {
    /// Reads the set stored under `key`; `None` if nothing was ever written.
    fn read_set(&self, key: &str) -> Result<Option<BTreeSet<String>>, StorageError>;

    /// Replaces the set stored under `key`.
    fn write_set(&self, key: &str, ids: &BTreeSet<String>) -> Result<(), StorageError>;
}
