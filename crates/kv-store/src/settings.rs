//! Application settings management
//!
//! Stores non-sensitive configuration in a plain JSON file: which keychain
//! service the store writes to and the default log filter.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::native::SystemKeychain;
use crate::storage::KeychainStore;

/// Current settings file version
const SETTINGS_VERSION: u32 = 1;

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Keychain service all items are stored under
    pub service: String,
    /// Default `tracing` filter directive (e.g. "info", "kv_store=debug")
    pub log_filter: String,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self {
            version: SETTINGS_VERSION,
            service: SystemKeychain::DEFAULT_SERVICE.to_string(),
            log_filter: "info".to_string(),
        }
    }

    /// Keychain binding for the configured service
    pub fn keychain(&self) -> SystemKeychain {
        SystemKeychain::with_service(&self.service)
    }

    /// Keychain-backed store for the configured service
    pub fn keychain_store(&self) -> KeychainStore {
        KeychainStore::with_keychain(self.keychain())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Load settings from `settings.json` in `config_dir`, falling back to
    /// defaults when the file is missing
    pub fn new(config_dir: &Path) -> Result<Self> {
        let settings_file = config_dir.join("settings.json");
        let settings = Self::load_from_file(&settings_file)?;

        Ok(Self {
            settings_file,
            settings,
        })
    }

    /// Load settings from the platform config directory
    pub fn open_default() -> Result<Self> {
        Self::new(&Self::default_dir()?)
    }

    /// Platform config directory for kv-store
    pub fn default_dir() -> Result<PathBuf> {
        ProjectDirs::from("com", "kv-store", "kv-store")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| StoreError::Config("Could not determine config directory".to_string()))
    }

    /// Load settings from file
    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Settings::new());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;

        if settings.version > SETTINGS_VERSION {
            return Err(StoreError::Config(format!(
                "Unsupported settings version {} in {:?}",
                settings.version, path
            )));
        }

        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&self.settings)?;

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        std::fs::write(&temp_path, &contents)?;
        std::fs::rename(&temp_path, &self.settings_file)?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Update settings and save
    pub fn update(&mut self, settings: Settings) -> Result<()> {
        self.settings = settings;
        self.save()
    }

    /// Path of the backing settings file
    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }

    /// Reset settings to defaults and delete settings file
    pub fn reset(&mut self) -> Result<()> {
        self.settings = Settings::default();

        if self.settings_file.exists() {
            std::fs::remove_file(&self.settings_file)?;
        }

        Ok(())
    }
}
