//! Storage trait definitions

use crate::error::Result;

/// Trait for key-value storage backends
///
/// Keys are opaque text and values are opaque bytes. Setting a key replaces
/// its previous value entirely. Implementations are not synchronized; callers
/// sharing a store across threads must serialize access themselves.
pub trait KeyValueStore {
    /// Associate `value` with `key`, replacing any existing value
    fn set_value(&mut self, key: &str, value: &[u8]) -> Result<()>;

    /// Get the value stored for `key`
    ///
    /// Fails with [`StoreError::NoValueFound`](crate::StoreError::NoValueFound)
    /// if the key has no value.
    fn get_value(&self, key: &str) -> Result<Vec<u8>>;

    /// Remove the value stored for `key`
    ///
    /// Fails with [`StoreError::NoValueFound`](crate::StoreError::NoValueFound)
    /// if the key has no value.
    fn delete_value(&mut self, key: &str) -> Result<()>;

    /// Remove every value owned by this store
    fn delete_all_values(&mut self) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn set_value(&mut self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set_value(key, value)
    }

    fn get_value(&self, key: &str) -> Result<Vec<u8>> {
        (**self).get_value(key)
    }

    fn delete_value(&mut self, key: &str) -> Result<()> {
        (**self).delete_value(key)
    }

    fn delete_all_values(&mut self) -> Result<()> {
        (**self).delete_all_values()
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn set_value(&mut self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set_value(key, value)
    }

    fn get_value(&self, key: &str) -> Result<Vec<u8>> {
        (**self).get_value(key)
    }

    fn delete_value(&mut self, key: &str) -> Result<()> {
        (**self).delete_value(key)
    }

    fn delete_all_values(&mut self) -> Result<()> {
        (**self).delete_all_values()
    }
}
