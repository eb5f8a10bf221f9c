//! Durable key/value storage
//!
//! Everything the storefront persists between runs (cache entries and the cart
//! counter) goes through a [`KeyValueStore`]. Components receive the store
//! explicitly instead of reaching for process-wide state, so tests can hand
//! them a [`MemoryStore`] while the binary uses a [`FileStore`].

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors that can occur when persisting a value
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing to the backing medium failed
    #[error("Failed to write key '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// A string-to-string store that survives process restarts
///
/// Reads never fail: anything that cannot be read is reported as absent.
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
