//! Storage backends implementing the key-value contract
//!
//! This module provides two storage backends:
//! 1. In-memory map (volatile, for caching and tests)
//! 2. OS Keychain (persistent, via the native keychain seam)

mod traits;
mod in_memory;
mod keychain;

pub use traits::KeyValueStore;
pub use in_memory::InMemoryStore;
pub use keychain::KeychainStore;
