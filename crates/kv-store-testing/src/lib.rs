//! # kv-store-testing
//!
//! Test doubles for code written against [`kv_store::KeyValueStore`]:
//! - [`MockKeyValueStore`] records calls and replays scripted results
//! - [`StubKeyValueStore`] accepts everything and stores nothing

mod mock;
mod stub;

pub use mock::{MockKeyValueStore, SetValueCall};
pub use stub::StubKeyValueStore;
