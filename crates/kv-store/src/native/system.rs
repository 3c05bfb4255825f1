//! OS keychain binding
//!
//! Uses the system credential store through `keyring`:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KWallet)
//!
//! Every item lives under one keyring service, with the account attribute
//! as the keyring user. Credential stores cannot be enumerated portably, so
//! the accounts written through this binding are also recorded in a
//! manifest item under the same service. Deleting the whole class walks the
//! manifest.

use std::collections::BTreeSet;

use base64::Engine;
use keyring::Entry;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::{ItemQuery, Keychain, Status};

/// Account reserved for the manifest item
const MANIFEST_ACCOUNT: &str = "__kv_store_manifest__";

type NativeResult<T> = std::result::Result<T, Status>;

/// Production [`Keychain`] backed by the OS credential store
#[derive(Debug, Clone)]
pub struct SystemKeychain {
    service: String,
}

impl SystemKeychain {
    /// Service name used when none is configured
    pub const DEFAULT_SERVICE: &'static str = "kv-store";

    /// Bind to the default service
    pub fn new() -> Self {
        Self::with_service(Self::DEFAULT_SERVICE)
    }

    /// Bind to a custom service, keeping its items apart from other stores
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, account: &str) -> NativeResult<Entry> {
        Entry::new(&self.service, account).map_err(|e| status_for(&e))
    }

    /// Accounts recorded in the manifest
    ///
    /// An undecodable manifest reads as empty, so the next write replaces it
    /// and the store keeps working. Items it listed are no longer covered by
    /// bulk deletes.
    fn read_manifest(&self) -> NativeResult<BTreeSet<String>> {
        match self.entry(MANIFEST_ACCOUNT)?.get_password() {
            Ok(json) => {
                let json = Zeroizing::new(json);
                match serde_json::from_str(&json) {
                    Ok(accounts) => Ok(accounts),
                    Err(e) => {
                        warn!(
                            service = %self.service,
                            "Discarding corrupt keychain manifest, previously recorded items will not be bulk deleted: {}",
                            e
                        );
                        Ok(BTreeSet::new())
                    }
                }
            }
            Err(keyring::Error::NoEntry) => Ok(BTreeSet::new()),
            Err(e) => Err(status_for(&e)),
        }
    }

    fn write_manifest(&self, accounts: &BTreeSet<String>) -> NativeResult<()> {
        let entry = self.entry(MANIFEST_ACCOUNT)?;

        if accounts.is_empty() {
            return match entry.delete_password() {
                Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                Err(e) => Err(status_for(&e)),
            };
        }

        let json = serde_json::to_string(accounts).map_err(|_| Status::PARAM)?;
        entry.set_password(&json).map_err(|e| status_for(&e))
    }

    fn add(&self, attributes: &ItemQuery) -> NativeResult<()> {
        let (Some(account), Some(value)) = (&attributes.account, &attributes.value) else {
            return Err(Status::PARAM);
        };
        if account == MANIFEST_ACCOUNT {
            return Err(Status::PARAM);
        }

        let entry = self.entry(account)?;

        // Record the account first so a later bulk delete can never miss it
        let mut accounts = self.read_manifest()?;
        if accounts.insert(account.clone()) {
            self.write_manifest(&accounts)?;
        }

        // Keychains store strings
        let encoded = Zeroizing::new(base64::engine::general_purpose::STANDARD.encode(value));
        entry.set_password(&encoded).map_err(|e| status_for(&e))?;

        debug!(service = %self.service, "Added keychain item: {}", account);
        Ok(())
    }

    fn copy(&self, query: &ItemQuery) -> NativeResult<Option<Vec<u8>>> {
        let Some(account) = &query.account else {
            return Err(Status::PARAM);
        };
        if account == MANIFEST_ACCOUNT {
            return Err(Status::ITEM_NOT_FOUND);
        }

        let encoded = self
            .entry(account)?
            .get_password()
            .map(Zeroizing::new)
            .map_err(|e| status_for(&e))?;

        if !query.return_data {
            return Ok(None);
        }

        let value = base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(|_| Status::DECODE)?;
        Ok(Some(value))
    }

    fn delete_account(&self, account: &str) -> NativeResult<()> {
        if account == MANIFEST_ACCOUNT {
            return Err(Status::PARAM);
        }

        self.entry(account)?
            .delete_password()
            .map_err(|e| status_for(&e))?;

        // A stale manifest entry is harmless, bulk delete skips missing items
        let pruned = self.read_manifest().and_then(|mut accounts| {
            if accounts.remove(account) {
                self.write_manifest(&accounts)
            } else {
                Ok(())
            }
        });
        if let Err(status) = pruned {
            warn!(service = %self.service, "Failed to prune keychain manifest: {}", status);
        }

        debug!(service = %self.service, "Deleted keychain item: {}", account);
        Ok(())
    }

    fn delete_all(&self) -> NativeResult<()> {
        let accounts = self.read_manifest()?;
        let mut remaining = BTreeSet::new();
        let mut first_failure = None;

        for account in accounts {
            let deleted = self
                .entry(&account)
                .and_then(|entry| match entry.delete_password() {
                    Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                    Err(e) => Err(status_for(&e)),
                });

            if let Err(status) = deleted {
                warn!(service = %self.service, "Failed to delete keychain item {}: {}", account, status);
                first_failure.get_or_insert(status);
                remaining.insert(account);
            }
        }

        self.write_manifest(&remaining)?;

        match first_failure {
            Some(status) => Err(status),
            None => {
                debug!(service = %self.service, "Deleted all keychain items");
                Ok(())
            }
        }
    }
}

impl Default for SystemKeychain {
    fn default() -> Self {
        Self::new()
    }
}

impl Keychain for SystemKeychain {
    fn add_item(&self, attributes: &ItemQuery) -> Status {
        self.add(attributes).err().unwrap_or(Status::SUCCESS)
    }

    fn delete_items(&self, query: &ItemQuery) -> Status {
        let result = match &query.account {
            Some(account) => self.delete_account(account),
            None => self.delete_all(),
        };
        result.err().unwrap_or(Status::SUCCESS)
    }

    fn copy_matching_item(&self, query: &ItemQuery) -> (Status, Option<Vec<u8>>) {
        match self.copy(query) {
            Ok(value) => (Status::SUCCESS, value),
            Err(status) => (status, None),
        }
    }
}

/// Translate a keyring failure into the native status it corresponds to
fn status_for(error: &keyring::Error) -> Status {
    match error {
        keyring::Error::NoEntry => Status::ITEM_NOT_FOUND,
        keyring::Error::NoStorageAccess(_) => Status::INTERACTION_NOT_ALLOWED,
        keyring::Error::BadEncoding(_) => Status::DECODE,
        keyring::Error::TooLong(..) | keyring::Error::Invalid(..) => Status::PARAM,
        keyring::Error::Ambiguous(_) => Status::DUPLICATE_ITEM,
        _ => Status::IO,
    }
}
