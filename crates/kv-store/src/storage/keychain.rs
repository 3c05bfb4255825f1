//! OS Keychain storage backend
//!
//! Maps the key-value contract onto keychain item queries. The key becomes
//! the item's account attribute and the value its data. The store keeps no
//! state of its own; the keychain owns every value.

use tracing::{debug, warn};

use super::KeyValueStore;
use crate::error::{Result, StoreError};
use crate::native::{ItemQuery, Keychain, Status, SystemKeychain};

/// Keychain-backed store
#[derive(Debug, Clone, Default)]
pub struct KeychainStore<K = SystemKeychain> {
    keychain: K,
}

impl KeychainStore {
    /// Create a store bound to the system keychain under the default service
    pub fn new() -> Self {
        Self::with_keychain(SystemKeychain::new())
    }
}

impl<K: Keychain> KeychainStore<K> {
    /// Create a store on top of any keychain implementation
    pub fn with_keychain(keychain: K) -> Self {
        Self { keychain }
    }

    /// The keychain this store talks to
    pub fn keychain(&self) -> &K {
        &self.keychain
    }
}

impl<K: Keychain> KeyValueStore for KeychainStore<K> {
    fn set_value(&mut self, key: &str, value: &[u8]) -> Result<()> {
        // Clear any previous item; a missing one is expected here
        let status = self.keychain.delete_items(&ItemQuery::account(key));
        if !status.is_success() && status != Status::ITEM_NOT_FOUND {
            debug!("Ignoring pre-write delete failure for {}: {}", key, status);
        }

        let status = self.keychain.add_item(&ItemQuery::add(key, value));
        if !status.is_success() {
            return Err(StoreError::WriteFailed {
                key: key.to_string(),
                status,
            });
        }

        debug!("Stored key in keychain: {}", key);
        Ok(())
    }

    fn get_value(&self, key: &str) -> Result<Vec<u8>> {
        match self.keychain.copy_matching_item(&ItemQuery::read(key)) {
            (status, Some(value)) if status.is_success() => {
                debug!("Retrieved key from keychain: {}", key);
                Ok(value)
            }
            (status, _) => {
                debug!("Key not found in keychain: {} ({})", key, status);
                Err(StoreError::no_value_found(key))
            }
        }
    }

    fn delete_value(&mut self, key: &str) -> Result<()> {
        let status = self.keychain.delete_items(&ItemQuery::account(key));

        if status.is_success() {
            debug!("Deleted key from keychain: {}", key);
            return Ok(());
        }

        // The keychain cannot tell absence apart from other delete failures,
        // so every failure surfaces as a missing key
        if status != Status::ITEM_NOT_FOUND {
            warn!("Keychain delete for {} failed with {}, reporting as not found", key, status);
        }
        Err(StoreError::no_value_found(key))
    }

    fn delete_all_values(&mut self) -> Result<()> {
        let status = self.keychain.delete_items(&ItemQuery::all());

        if !status.is_success() {
            return Err(StoreError::Unhandled { status });
        }

        debug!("Cleared all keychain entries");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Keychain double recording every query and replaying scripted statuses.
    /// Unscripted calls succeed (copies return no data).
    #[derive(Default)]
    struct MockKeychain {
        state: Mutex<MockKeychainState>,
    }

    #[derive(Default)]
    struct MockKeychainState {
        calls_add_item: Vec<ItemQuery>,
        calls_delete_items: Vec<ItemQuery>,
        calls_copy_matching_item: Vec<ItemQuery>,
        return_add_item: VecDeque<Status>,
        return_delete_items: VecDeque<Status>,
        return_copy_matching_item: VecDeque<(Status, Option<Vec<u8>>)>,
        /// Order of native calls across all primitives
        sequence: Vec<&'static str>,
    }

    impl MockKeychain {
        fn with_add(self, statuses: impl IntoIterator<Item = Status>) -> Self {
            self.state.lock().unwrap().return_add_item.extend(statuses);
            self
        }

        fn with_delete(self, statuses: impl IntoIterator<Item = Status>) -> Self {
            self.state.lock().unwrap().return_delete_items.extend(statuses);
            self
        }

        fn with_copy(self, results: impl IntoIterator<Item = (Status, Option<Vec<u8>>)>) -> Self {
            self.state
                .lock()
                .unwrap()
                .return_copy_matching_item
                .extend(results);
            self
        }

        fn adds(&self) -> Vec<ItemQuery> {
            self.state.lock().unwrap().calls_add_item.clone()
        }

        fn deletes(&self) -> Vec<ItemQuery> {
            self.state.lock().unwrap().calls_delete_items.clone()
        }

        fn copies(&self) -> Vec<ItemQuery> {
            self.state.lock().unwrap().calls_copy_matching_item.clone()
        }

        fn sequence(&self) -> Vec<&'static str> {
            self.state.lock().unwrap().sequence.clone()
        }
    }

    impl Keychain for MockKeychain {
        fn add_item(&self, attributes: &ItemQuery) -> Status {
            let mut state = self.state.lock().unwrap();
            state.calls_add_item.push(attributes.clone());
            state.sequence.push("add_item");
            state.return_add_item.pop_front().unwrap_or(Status::SUCCESS)
        }

        fn delete_items(&self, query: &ItemQuery) -> Status {
            let mut state = self.state.lock().unwrap();
            state.calls_delete_items.push(query.clone());
            state.sequence.push("delete_items");
            state.return_delete_items.pop_front().unwrap_or(Status::SUCCESS)
        }

        fn copy_matching_item(&self, query: &ItemQuery) -> (Status, Option<Vec<u8>>) {
            let mut state = self.state.lock().unwrap();
            state.calls_copy_matching_item.push(query.clone());
            state.sequence.push("copy_matching_item");
            state
                .return_copy_matching_item
                .pop_front()
                .unwrap_or((Status::SUCCESS, None))
        }
    }

    fn make_store(keychain: MockKeychain) -> KeychainStore<MockKeychain> {
        KeychainStore::with_keychain(keychain)
    }

    // set_value

    #[test]
    fn test_set_value_deletes_then_adds_generic_password() {
        let mut store = make_store(MockKeychain::default());

        store.set_value("a-key", b"some data").unwrap();

        let keychain = store.keychain();
        assert_eq!(keychain.sequence(), vec!["delete_items", "add_item"]);
        assert_eq!(keychain.deletes(), vec![ItemQuery::account("a-key")]);

        let adds = keychain.adds();
        assert_eq!(adds.len(), 1);
        assert_eq!(adds[0].class, crate::native::ItemClass::GenericPassword);
        assert_eq!(adds[0].account.as_deref(), Some("a-key"));
        assert_eq!(adds[0].value.as_deref(), Some(&b"some data"[..]));
    }

    #[test]
    fn test_set_value_ignores_pre_delete_failure() {
        let mut store = make_store(
            MockKeychain::default().with_delete([Status::ITEM_NOT_FOUND]),
        );

        store.set_value("a-key", b"some data").unwrap();
        assert_eq!(store.keychain().adds().len(), 1);

        let mut store = make_store(MockKeychain::default().with_delete([Status::IO]));
        store.set_value("a-key", b"some data").unwrap();
        assert_eq!(store.keychain().adds().len(), 1);
    }

    #[test]
    fn test_set_value_when_add_fails_returns_write_failed() {
        let mut store = make_store(
            MockKeychain::default().with_add([Status::DUPLICATE_ITEM]),
        );

        let err = store.set_value("a-key", b"some data").unwrap_err();

        match err {
            StoreError::WriteFailed { key, status } => {
                assert_eq!(key, "a-key");
                assert_eq!(status, Status::DUPLICATE_ITEM);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    // get_value

    #[test]
    fn test_get_value_copies_single_matching_item() {
        let store = make_store(
            MockKeychain::default().with_copy([(Status::SUCCESS, Some(b"some data".to_vec()))]),
        );

        store.get_value("a-key").unwrap();

        let copies = store.keychain().copies();
        assert_eq!(copies, vec![ItemQuery::read("a-key")]);
        assert!(copies[0].return_data);
        assert_eq!(copies[0].match_limit, Some(crate::native::MatchLimit::One));
    }

    #[test]
    fn test_get_value_returns_copied_data() {
        let store = make_store(
            MockKeychain::default().with_copy([(Status::SUCCESS, Some(b"some data".to_vec()))]),
        );

        assert_eq!(store.get_value("any-key").unwrap(), b"some data".to_vec());
    }

    #[test]
    fn test_get_value_when_status_fails_returns_no_value_found() {
        let store = make_store(MockKeychain::default().with_copy([(Status(123), None)]));

        let err = store.get_value("a-key").unwrap_err();
        assert_eq!(err.missing_key(), Some("a-key"));
    }

    #[test]
    fn test_get_value_when_no_data_returns_no_value_found() {
        let store = make_store(MockKeychain::default().with_copy([(Status::SUCCESS, None)]));

        let err = store.get_value("a-key").unwrap_err();
        assert_eq!(err.missing_key(), Some("a-key"));
    }

    #[test]
    fn test_get_value_ignores_data_on_failure_status() {
        let store = make_store(
            MockKeychain::default().with_copy([(Status::IO, Some(b"stale".to_vec()))]),
        );

        assert!(store.get_value("a-key").is_err());
    }

    // delete_value

    #[test]
    fn test_delete_value_removes_matching_item() {
        let mut store = make_store(MockKeychain::default());

        store.delete_value("a-key").unwrap();

        assert_eq!(store.keychain().deletes(), vec![ItemQuery::account("a-key")]);
    }

    #[test]
    fn test_delete_value_when_missing_returns_no_value_found() {
        let mut store = make_store(MockKeychain::default().with_delete([Status(123)]));

        let err = store.delete_value("a-key").unwrap_err();
        assert_eq!(err.missing_key(), Some("a-key"));
    }

    #[test]
    fn test_delete_value_maps_any_failure_to_no_value_found() {
        let mut store = make_store(
            MockKeychain::default().with_delete([Status::INTERACTION_NOT_ALLOWED]),
        );

        let err = store.delete_value("a-key").unwrap_err();
        assert_eq!(err.missing_key(), Some("a-key"));
    }

    // delete_all_values

    #[test]
    fn test_delete_all_values_deletes_whole_class() {
        let mut store = make_store(MockKeychain::default());

        store.delete_all_values().unwrap();

        let deletes = store.keychain().deletes();
        assert_eq!(deletes, vec![ItemQuery::all()]);
        assert_eq!(deletes[0].account, None);
    }

    #[test]
    fn test_delete_all_values_failure_is_unhandled() {
        let mut store = make_store(MockKeychain::default().with_delete([Status::IO]));

        let err = store.delete_all_values().unwrap_err();
        assert!(matches!(err, StoreError::Unhandled { status } if status == Status::IO));
    }

    // System keychain

    #[test]
    fn test_uses_system_keychain_by_default() {
        let store = KeychainStore::new();
        assert_eq!(store.keychain().service(), SystemKeychain::DEFAULT_SERVICE);
    }

    #[test]
    #[ignore = "requires an unlocked OS keychain - run manually with --ignored"]
    fn test_system_keychain_storage_works() {
        let service = format!("kv-store.test.store.{}", std::process::id());
        let mut store = KeychainStore::with_keychain(SystemKeychain::with_service(service));

        let (key1, key2, key3) = ("test.exampleKey1", "test.exampleKey2", "test.exampleKey3");

        let err = store.get_value(key1).unwrap_err();
        assert_eq!(err.missing_key(), Some(key1));

        store.set_value(key1, b"some data").unwrap();
        store.set_value(key2, b"some other data").unwrap();
        assert_eq!(store.get_value(key1).unwrap(), b"some data".to_vec());
        assert_eq!(store.get_value(key2).unwrap(), b"some other data".to_vec());

        store.set_value(key1, b"changed data").unwrap();
        assert_eq!(store.get_value(key1).unwrap(), b"changed data".to_vec());
        assert_eq!(store.get_value(key2).unwrap(), b"some other data".to_vec());

        let err = store.delete_value(key3).unwrap_err();
        assert_eq!(err.missing_key(), Some(key3));

        store.delete_value(key1).unwrap();
        store.delete_all_values().unwrap();
        assert!(store.get_value(key2).is_err());
    }
}
