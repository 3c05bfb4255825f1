//! Error types for kv-store

use thiserror::Error;

use crate::native::Status;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Store error types
#[derive(Error, Debug)]
pub enum StoreError {
    /// No value is associated with the key.
    ///
    /// The keychain store also reports this for every failed single-item
    /// delete, since the native API does not tell absence apart from other
    /// delete failures.
    #[error("No value found for key: {key}")]
    NoValueFound { key: String },

    /// The keychain refused to add the item.
    #[error("Failed to write value for key {key}: {status}")]
    WriteFailed { key: String, status: Status },

    /// A native failure with no more specific meaning, such as a failed
    /// bulk delete.
    #[error("Unhandled keychain failure: {status}")]
    Unhandled { status: Status },

    /// A scripted test double was called more times than it was scripted for.
    #[error("No scripted result for {operation}")]
    NoScriptedResult { operation: &'static str },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Shorthand for [`StoreError::NoValueFound`]
    pub fn no_value_found(key: impl Into<String>) -> Self {
        Self::NoValueFound { key: key.into() }
    }

    /// The missing key, if this is a [`StoreError::NoValueFound`]
    pub fn missing_key(&self) -> Option<&str> {
        match self {
            Self::NoValueFound { key } => Some(key),
            _ => None,
        }
    }
}
