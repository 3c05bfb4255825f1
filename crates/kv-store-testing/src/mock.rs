//! Recording, scripted store double

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use kv_store::{KeyValueStore, Result, StoreError};

/// Arguments of one `set_value` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetValueCall {
    pub key: String,
    pub value: Vec<u8>,
}

/// Store double that records every call and answers from per-operation
/// FIFO queues of scripted results
///
/// Each call consumes the next scripted result for its operation. Once a
/// queue runs dry the call fails with [`StoreError::NoScriptedResult`].
///
/// ```
/// use kv_store::{KeyValueStore, StoreError};
/// use kv_store_testing::MockKeyValueStore;
///
/// let store = MockKeyValueStore::new()
///     .returning_get_value([Ok(b"token".to_vec())]);
///
/// assert_eq!(store.get_value("auth").unwrap(), b"token".to_vec());
/// assert!(matches!(
///     store.get_value("auth"),
///     Err(StoreError::NoScriptedResult { .. })
/// ));
/// assert_eq!(store.get_value_calls(), vec!["auth", "auth"]);
/// ```
#[derive(Debug, Default)]
pub struct MockKeyValueStore {
    state: Mutex<MockState>,
}

#[derive(Debug, Default)]
struct MockState {
    set_value_calls: Vec<SetValueCall>,
    get_value_calls: Vec<String>,
    delete_value_calls: Vec<String>,
    delete_all_values_calls: usize,

    set_value_returns: VecDeque<Result<()>>,
    get_value_returns: VecDeque<Result<Vec<u8>>>,
    delete_value_returns: VecDeque<Result<()>>,
    delete_all_values_returns: VecDeque<Result<()>>,
}

impl MockKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A panicking test must not hide the calls recorded before it
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Scripting

    /// Queue results for `set_value`
    pub fn returning_set_value(self, results: impl IntoIterator<Item = Result<()>>) -> Self {
        self.state().set_value_returns.extend(results);
        self
    }

    /// Queue results for `get_value`
    pub fn returning_get_value(self, results: impl IntoIterator<Item = Result<Vec<u8>>>) -> Self {
        self.state().get_value_returns.extend(results);
        self
    }

    /// Queue results for `delete_value`
    pub fn returning_delete_value(self, results: impl IntoIterator<Item = Result<()>>) -> Self {
        self.state().delete_value_returns.extend(results);
        self
    }

    /// Queue results for `delete_all_values`
    pub fn returning_delete_all_values(
        self,
        results: impl IntoIterator<Item = Result<()>>,
    ) -> Self {
        self.state().delete_all_values_returns.extend(results);
        self
    }

    pub fn push_set_value(&self, result: Result<()>) {
        self.state().set_value_returns.push_back(result);
    }

    pub fn push_get_value(&self, result: Result<Vec<u8>>) {
        self.state().get_value_returns.push_back(result);
    }

    pub fn push_delete_value(&self, result: Result<()>) {
        self.state().delete_value_returns.push_back(result);
    }

    pub fn push_delete_all_values(&self, result: Result<()>) {
        self.state().delete_all_values_returns.push_back(result);
    }

    // Call history

    pub fn set_value_calls(&self) -> Vec<SetValueCall> {
        self.state().set_value_calls.clone()
    }

    pub fn get_value_calls(&self) -> Vec<String> {
        self.state().get_value_calls.clone()
    }

    pub fn delete_value_calls(&self) -> Vec<String> {
        self.state().delete_value_calls.clone()
    }

    /// Number of `delete_all_values` calls
    pub fn delete_all_values_calls(&self) -> usize {
        self.state().delete_all_values_calls
    }
}

fn next_result<T>(queue: &mut VecDeque<Result<T>>, operation: &'static str) -> Result<T> {
    queue
        .pop_front()
        .unwrap_or(Err(StoreError::NoScriptedResult { operation }))
}

impl KeyValueStore for MockKeyValueStore {
    fn set_value(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let mut state = self.state();
        state.set_value_calls.push(SetValueCall {
            key: key.to_string(),
            value: value.to_vec(),
        });
        next_result(&mut state.set_value_returns, "set_value")
    }

    fn get_value(&self, key: &str) -> Result<Vec<u8>> {
        let mut state = self.state();
        state.get_value_calls.push(key.to_string());
        next_result(&mut state.get_value_returns, "get_value")
    }

    fn delete_value(&mut self, key: &str) -> Result<()> {
        let mut state = self.state();
        state.delete_value_calls.push(key.to_string());
        next_result(&mut state.delete_value_returns, "delete_value")
    }

    fn delete_all_values(&mut self) -> Result<()> {
        let mut state = self.state();
        state.delete_all_values_calls += 1;
        next_result(&mut state.delete_all_values_returns, "delete_all_values")
    }
}
