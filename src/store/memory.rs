use std::collections::HashMap;
use std::sync::Mutex;

use super::{KeyValueStore, StoreError};

/// In-process store, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_set_then_get_returns_latest_value() {
        let store = MemoryStore::new();
        store.set("cartCount", "1").unwrap();
        store.set("cartCount", "2").unwrap();
        assert_eq!(store.get("cartCount").as_deref(), Some("2"));
    }
}
