//! Client-local session storage for roadwatch.
//!
//! This crate provides the key/value persistence the session gateway keeps
//! its credential in. It plays the part a browser's local storage plays for
//! a web page: a flat map of string keys to string values that outlives a
//! single process.
//!
//! # Backends
//!
//! - [`MemoryStore`]: process-local, for tests and embedding
//! - [`RocksStore`]: `RocksDB`-backed, survives restarts
//!
//! # Example
//!
//! ```
//! use roadwatch_store::{schema::keys, MemoryStore, SessionStore};
//!
//! let store = MemoryStore::new();
//! store.set(keys::TOKEN, "abc").unwrap();
//! assert_eq!(store.get(keys::TOKEN).unwrap().as_deref(), Some("abc"));
//!
//! store.remove(keys::TOKEN).unwrap();
//! assert!(store.get(keys::TOKEN).unwrap().is_none());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod memory;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use rocks::RocksStore;

/// The storage trait defining the key/value operations.
///
/// Access is synchronous. Implementations are internally synchronized so a
/// store can be shared between concurrent requests.
pub trait SessionStore: Send + Sync {
    /// Get the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: SessionStore + ?Sized> SessionStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
