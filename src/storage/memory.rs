// In-memory storage, used by tests and short-lived sessions

use anyhow::Result;
use dashmap::DashMap;
use std::sync::Arc;

use super::ClientStorage;

/// Thread-safe in-memory key/value storage
#[derive(Default)]
pub struct MemoryStorage {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Clone for MemoryStorage {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_basic() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());
        assert_eq!(storage.get("access").unwrap(), None);

        storage.set("access", "a1").unwrap();
        assert_eq!(storage.get("access").unwrap().as_deref(), Some("a1"));

        storage.set("access", "a2").unwrap();
        assert_eq!(storage.get("access").unwrap().as_deref(), Some("a2"));
        assert_eq!(storage.len(), 1);

        storage.remove("access").unwrap();
        assert_eq!(storage.get("access").unwrap(), None);

        // Removing twice is fine
        storage.remove("access").unwrap();
    }

    #[test]
    fn test_clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        other.set("theme", "dark").unwrap();
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
    }
}
