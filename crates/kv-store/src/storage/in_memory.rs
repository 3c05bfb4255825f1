//! In-memory storage backend
//!
//! Keeps every value in a single owned map. Nothing survives the process.

use std::collections::HashMap;
use tracing::debug;

use super::KeyValueStore;
use crate::error::{Result, StoreError};

/// Volatile map-backed store
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with `entries`
    pub fn with_entries(entries: HashMap<String, Vec<u8>>) -> Self {
        Self { entries }
    }

    /// Current contents of the store
    pub fn entries(&self) -> &HashMap<String, Vec<u8>> {
        &self.entries
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<HashMap<String, Vec<u8>>> for InMemoryStore {
    fn from(entries: HashMap<String, Vec<u8>>) -> Self {
        Self::with_entries(entries)
    }
}

impl KeyValueStore for InMemoryStore {
    fn set_value(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_vec());
        debug!("Stored key in memory: {}", key);
        Ok(())
    }

    fn get_value(&self, key: &str) -> Result<Vec<u8>> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::no_value_found(key))
    }

    fn delete_value(&mut self, key: &str) -> Result<()> {
        match self.entries.remove(key) {
            Some(_) => {
                debug!("Deleted key from memory: {}", key);
                Ok(())
            }
            None => Err(StoreError::no_value_found(key)),
        }
    }

    fn delete_all_values(&mut self) -> Result<()> {
        self.entries.clear();
        debug!("Cleared all in-memory entries");
        Ok(())
    }
}
