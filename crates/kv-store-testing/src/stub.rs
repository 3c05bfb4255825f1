//! No-op store stub

use kv_store::{KeyValueStore, Result};

/// Store where every operation succeeds and nothing is kept.
/// Reads return an empty value.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubKeyValueStore;

impl StubKeyValueStore {
    pub fn new() -> Self {
        Self
    }
}

impl KeyValueStore for StubKeyValueStore {
    fn set_value(&mut self, _key: &str, _value: &[u8]) -> Result<()> {
        Ok(())
    }

    fn get_value(&self, _key: &str) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn delete_value(&mut self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn delete_all_values(&mut self) -> Result<()> {
        Ok(())
    }
}
