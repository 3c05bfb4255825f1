//! Native keychain seam
//!
//! The keychain store talks to the platform credential store only through
//! the three primitives of the [`Keychain`] trait:
//! - add an item
//! - delete every item matching a query
//! - copy the data of the first item matching a query
//!
//! Each primitive answers with a native [`Status`] rather than an error, so
//! the store decides how platform outcomes map onto [`StoreError`](crate::StoreError).
//! Production code uses [`SystemKeychain`]; tests substitute a scripted
//! implementation.

mod system;

use std::fmt;

pub use system::SystemKeychain;

/// Native status code, numbered like the Security framework's `OSStatus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(pub i32);

impl Status {
    pub const SUCCESS: Status = Status(0);
    pub const IO: Status = Status(-36);
    pub const PARAM: Status = Status(-50);
    pub const DUPLICATE_ITEM: Status = Status(-25299);
    pub const ITEM_NOT_FOUND: Status = Status(-25300);
    pub const INTERACTION_NOT_ALLOWED: Status = Status(-25308);
    pub const DECODE: Status = Status(-26275);

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    fn description(self) -> &'static str {
        match self {
            Self::SUCCESS => "success",
            Self::IO => "I/O error",
            Self::PARAM => "invalid parameter",
            Self::DUPLICATE_ITEM => "duplicate item",
            Self::ITEM_NOT_FOUND => "item not found",
            Self::INTERACTION_NOT_ALLOWED => "interaction not allowed",
            Self::DECODE => "unable to decode data",
            _ => "unknown status",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status {} ({})", self.0, self.description())
    }
}

/// Category of keychain item. Every item this crate writes is a generic
/// password, which is also what bulk deletes are scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemClass {
    GenericPassword,
}

/// How many items a copy query may match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchLimit {
    One,
}

/// Attribute set used both to describe a new item and to query existing ones
#[derive(Clone, PartialEq, Eq)]
pub struct ItemQuery {
    /// Item category
    pub class: ItemClass,
    /// Account attribute; holds the store key. `None` matches every item of the class.
    pub account: Option<String>,
    /// Item data, only set when adding
    pub value: Option<Vec<u8>>,
    /// Whether a copy should hand back the item data
    pub return_data: bool,
    /// Match limit for copies
    pub match_limit: Option<MatchLimit>,
}

impl ItemQuery {
    /// Query matching every item of the class
    pub fn all() -> Self {
        Self {
            class: ItemClass::GenericPassword,
            account: None,
            value: None,
            return_data: false,
            match_limit: None,
        }
    }

    /// Query matching the item stored under `account`
    pub fn account(account: &str) -> Self {
        Self {
            account: Some(account.to_string()),
            ..Self::all()
        }
    }

    /// Attributes for a new item holding `value` under `account`
    pub fn add(account: &str, value: &[u8]) -> Self {
        Self {
            value: Some(value.to_vec()),
            ..Self::account(account)
        }
    }

    /// Query returning the data of the single item stored under `account`
    pub fn read(account: &str) -> Self {
        Self {
            return_data: true,
            match_limit: Some(MatchLimit::One),
            ..Self::account(account)
        }
    }
}

impl fmt::Debug for ItemQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemQuery")
            .field("class", &self.class)
            .field("account", &self.account)
            .field("value", &self.value.as_ref().map(|_| "[REDACTED]"))
            .field("return_data", &self.return_data)
            .field("match_limit", &self.match_limit)
            .finish()
    }
}

/// The native keychain primitives
pub trait Keychain: Send + Sync {
    /// Add a new item described by `attributes`
    fn add_item(&self, attributes: &ItemQuery) -> Status;

    /// Delete every item matching `query`
    fn delete_items(&self, query: &ItemQuery) -> Status;

    /// Copy the data of the item matching `query`
    ///
    /// Data is only returned when the status is [`Status::SUCCESS`] and the
    /// query asked for it.
    fn copy_matching_item(&self, query: &ItemQuery) -> (Status, Option<Vec<u8>>);
}
