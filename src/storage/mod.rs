//! Persistence capabilities behind one write interface.
//!
//! The engine mutates its in-memory ledger and flushes whole snapshots;
//! which backend receives them is decided once at construction.

pub mod json_backend;
pub mod memory;
pub mod remote;

use std::path::PathBuf;

use crate::config::StorageMode;
use crate::errors::{CoreError, Result};
use crate::ledger::Ledger;

/// Abstraction over persistence backends capable of storing the ledger
/// snapshot.
pub trait StorageBackend: Send + Sync {
    /// Returns the persisted snapshot, or `None` when the backend holds
    /// nothing yet.
    fn load(&self) -> Result<Option<Ledger>>;
    fn save(&self, ledger: &Ledger) -> Result<()>;
}

/// Builds the backend a configuration names. Remote storage needs a
/// caller-wired persistence client and cannot be built from config alone.
pub fn backend_for(mode: &StorageMode) -> Result<Box<dyn StorageBackend>> {
    match mode {
        StorageMode::Memory => Ok(Box::new(memory::MemoryStorage::new())),
        StorageMode::LocalFile { path } => {
            let storage = match path {
                Some(path) => json_backend::JsonStorage::new(PathBuf::from(path)),
                None => json_backend::JsonStorage::default_location()?,
            };
            Ok(Box::new(storage))
        }
        StorageMode::Remote => Err(CoreError::InvalidOperation(
            "remote storage requires a persistence client".into(),
        )),
    }
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;
pub use remote::{PersistenceApi, RemoteStorage};
