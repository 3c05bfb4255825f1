//! # kv-store
//!
//! Minimal key-value persistence with interchangeable backends:
//! - [`InMemoryStore`]: volatile map, for caching and tests
//! - [`KeychainStore`]: OS keychain via a substitutable native seam
//!
//! Both implement [`KeyValueStore`]. Code that only depends on the trait can
//! swap backends freely, or take a test double from `kv-store-testing`.

pub mod error;
pub mod native;
pub mod settings;
pub mod storage;

pub use error::{Result, StoreError};
pub use native::{ItemClass, ItemQuery, Keychain, MatchLimit, Status, SystemKeychain};
pub use settings::{Settings, SettingsManager};
pub use storage::{InMemoryStore, KeyValueStore, KeychainStore};
