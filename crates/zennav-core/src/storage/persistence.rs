//! Local persistence adapter
//!
//! Typed access to the three local slots:
//! - `zennav_config_v1` - the configuration document (JSON)
//! - `zennav_theme` - `light` or `dark`
//! - `zennav_github_token` - the sync credential
//!
//! The slots are independent. Reading the document never fails: a missing or
//! unparsable value yields the built-in default document.

use tracing::{debug, warn};

use super::error::{StorageError, StorageResult};
use super::kv::{FileStore, KeyValueStore};
use crate::config::Config;
use crate::models::{SiteConfig, ThemeMode};

/// Key of the configuration document slot
pub const CONFIG_KEY: &str = "zennav_config_v1";
/// Key of the theme preference slot
pub const THEME_KEY: &str = "zennav_theme";
/// Key of the sync credential slot
pub const CREDENTIAL_KEY: &str = "zennav_github_token";

/// Typed persistence over a [`KeyValueStore`]
pub struct LocalPersistence<S> {
    store: S,
    fallback: SiteConfig,
}

impl LocalPersistence<FileStore> {
    /// File-backed persistence in the configured data directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(FileStore::new(&config.data_dir))
            .with_fallback(SiteConfig::default_document(config.admin_password.as_deref()))
    }
}

impl<S: KeyValueStore> LocalPersistence<S> {
    /// Create an adapter using the built-in default document as fallback
    pub fn new(store: S) -> Self {
        Self {
            store,
            fallback: SiteConfig::default(),
        }
    }

    /// Replace the document returned when nothing usable is stored
    pub fn with_fallback(mut self, fallback: SiteConfig) -> Self {
        self.fallback = fallback;
        self
    }

    /// The underlying key/value store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the stored document, or the default if absent or corrupted
    pub fn load(&self) -> SiteConfig {
        match self.try_load() {
            Ok(Some(config)) => config,
            Ok(None) => {
                debug!("No stored configuration, using default document");
                self.fallback.clone()
            }
            Err(e) => {
                warn!("Failed to load stored configuration, using default: {}", e);
                self.fallback.clone()
            }
        }
    }

    /// Load the stored document, surfacing read and parse errors
    pub fn try_load(&self) -> StorageResult<Option<SiteConfig>> {
        let Some(raw) = self.store.get(CONFIG_KEY)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::InvalidFormat {
                key: CONFIG_KEY.to_string(),
                details: e.to_string(),
            })
    }

    /// Store the full document, replacing any previous value
    pub fn save(&self, config: &SiteConfig) -> StorageResult<()> {
        let json = serde_json::to_string(config)?;
        self.store.set(CONFIG_KEY, &json)?;
        debug!(
            "Saved configuration ({} categories, {} links)",
            config.categories.len(),
            config.link_count()
        );
        Ok(())
    }

    /// Remove the stored document and return the default
    pub fn reset(&self) -> StorageResult<SiteConfig> {
        self.store.remove(CONFIG_KEY)?;
        Ok(self.fallback.clone())
    }

    /// Stored theme, or `system_default` when unset or unreadable
    pub fn theme(&self, system_default: ThemeMode) -> ThemeMode {
        match self.store.get(THEME_KEY) {
            Ok(Some(raw)) => ThemeMode::parse(&raw).unwrap_or(system_default),
            Ok(None) => system_default,
            Err(e) => {
                warn!("Failed to read theme preference: {}", e);
                system_default
            }
        }
    }

    pub fn save_theme(&self, theme: ThemeMode) -> StorageResult<()> {
        self.store.set(THEME_KEY, theme.as_str())
    }

    /// Stored sync credential (empty when unset)
    pub fn credential(&self) -> String {
        match self.store.get(CREDENTIAL_KEY) {
            Ok(Some(raw)) => raw.trim().to_string(),
            Ok(None) => String::new(),
            Err(e) => {
                warn!("Failed to read sync credential: {}", e);
                String::new()
            }
        }
    }

    /// Store the sync credential, trimmed
    ///
    /// Tokens are sent in an HTTP header, so only visible ASCII is accepted.
    pub fn save_credential(&self, credential: &str) -> StorageResult<()> {
        let credential = credential.trim();
        if credential.chars().any(|c| !c.is_ascii_graphic()) {
            return Err(StorageError::Rejected {
                key: CREDENTIAL_KEY.to_string(),
                details: "token may only contain visible ASCII characters".to_string(),
            });
        }
        self.store.set(CREDENTIAL_KEY, credential)
    }

    pub fn clear_credential(&self) -> StorageResult<()> {
        self.store.remove(CREDENTIAL_KEY)
    }
}
