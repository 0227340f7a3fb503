//! Session-only storage.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{KeyValueStore, StorageError, StorageResult};

/// In-memory slot map. Clones share the same slots, so a test can hand one
/// handle to the store and keep another to inspect or tamper with the blobs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let slots = self.slots.lock().map_err(poisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut slots = self.slots.lock().map_err(poisoned)?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut slots = self.slots.lock().map_err(poisoned)?;
        slots.remove(key);
        Ok(())
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Unavailable(format!("Lock poisoned: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_slots() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();

        storage.write("a", "1").unwrap();
        assert_eq!(handle.read("a").unwrap(), Some("1".to_string()));

        handle.remove("a").unwrap();
        assert!(storage.is_empty());
    }
}
