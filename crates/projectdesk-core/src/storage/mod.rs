//! Key/value storage backends for persisted session slots.
//!
//! The session store only ever needs three synchronous operations on named
//! string slots. Backends provided here:
//!
//! - `FileStore`: a single JSON object file in the cache directory
//! - `KeychainStore`: one OS keychain entry per slot via `keyring`
//! - `MemoryStore`: process-local map, used by tests and ephemeral sessions

pub mod file;
pub mod keychain;
pub mod memory;

use thiserror::Error;

pub use file::FileStore;
pub use keychain::KeychainStore;
pub use memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keychain(#[from] keyring::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Synchronous string slots, addressed by key.
///
/// Implementations use interior mutability so a single instance can be shared
/// behind an `Arc` by everything that reads or clears the session.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a slot. Removing a missing slot is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
