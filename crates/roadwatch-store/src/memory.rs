//! In-memory storage implementation.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::Result;
use crate::SessionStore;

/// A process-local store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::keys;

    #[test]
    fn set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set(keys::ROLE, "citizen").unwrap();
        assert_eq!(store.get(keys::ROLE).unwrap().as_deref(), Some("citizen"));
        assert_eq!(store.len(), 1);

        store.set(keys::ROLE, "official").unwrap();
        assert_eq!(store.get(keys::ROLE).unwrap().as_deref(), Some("official"));
        assert_eq!(store.len(), 1);

        store.remove(keys::ROLE).unwrap();
        assert!(store.get(keys::ROLE).unwrap().is_none());
    }

    #[test]
    fn remove_absent_key_is_ok() {
        let store = MemoryStore::new();
        store.remove(keys::TOKEN).unwrap();
        assert!(store.is_empty());
    }
}
