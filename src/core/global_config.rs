//! Global configuration management
//!
//! Reads settings from `config.toml` in the config directory: where the
//! registry lives and how the snapshot is stored.
//!
//! ```toml
//! [registry]
//! url = "http://localhost:3000/api"
//! timeout_secs = 30
//!
//! [storage]
//! enabled = true
//! path = "/var/lib/staffdir"
//! quota_bytes = 5242880
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{defaults, urls};
use crate::infra::dirs::StaffdirDirs;
use crate::infra::snapshot_store::SnapshotStore;
use crate::infra::store::FileStore;
use crate::registry::HttpRegistry;

/// Global configuration error types
#[derive(Error, Debug)]
pub enum GlobalConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: String, error: String },
}

/// Global configuration for staffdir
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Registry settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Snapshot storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Registry configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Registry base URL
    pub url: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Snapshot storage configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Set to `false` to run without persistence
    pub enabled: Option<bool>,

    /// Directory of the file store
    pub path: Option<PathBuf>,

    /// Maximum bytes the file store accepts
    pub quota_bytes: Option<u64>,
}

impl GlobalConfig {
    /// Load global configuration from the config directory
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `GlobalConfigError::ParseError` if the config file exists but
    /// contains invalid TOML.
    pub fn load(dirs: &StaffdirDirs) -> Result<Self, GlobalConfigError> {
        Self::load_from_path(&dirs.config_path())
    }

    /// Load global configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, GlobalConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| GlobalConfigError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| GlobalConfigError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Get the effective registry URL
    ///
    /// `override_url` (from the command line or environment) wins over the
    /// config file, which wins over the default.
    #[must_use]
    pub fn registry_url<'a>(&'a self, override_url: Option<&'a str>) -> &'a str {
        override_url
            .or(self.registry.url.as_deref())
            .unwrap_or(urls::DEFAULT_REGISTRY)
    }

    /// Get the effective request timeout
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.registry
                .timeout_secs
                .unwrap_or(defaults::DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Whether snapshot persistence is enabled
    #[must_use]
    pub fn storage_enabled(&self) -> bool {
        self.storage.enabled.unwrap_or(true)
    }

    /// Get the effective store directory
    #[must_use]
    pub fn storage_dir(&self, dirs: &StaffdirDirs) -> PathBuf {
        self.storage
            .path
            .clone()
            .unwrap_or_else(|| dirs.store_dir())
    }

    /// Get the effective store quota
    #[must_use]
    pub fn storage_quota(&self) -> u64 {
        self.storage
            .quota_bytes
            .unwrap_or(defaults::DEFAULT_STORAGE_QUOTA)
    }

    /// Build the registry client
    pub fn build_registry(&self, override_url: Option<&str>) -> HttpRegistry {
        HttpRegistry::with_timeouts(
            self.registry_url(override_url),
            self.request_timeout(),
            Duration::from_secs(defaults::DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }

    /// Open the snapshot store
    ///
    /// Returns an unavailable store when persistence is disabled.
    pub async fn open_storage(&self, dirs: &StaffdirDirs) -> SnapshotStore {
        if !self.storage_enabled() {
            tracing::debug!("Snapshot persistence disabled by config");
            return SnapshotStore::unavailable();
        }

        let dir = self.storage_dir(dirs);
        tracing::debug!("Using snapshot store at {}", dir.display());
        let store = FileStore::new(dir).with_quota(self.storage_quota());
        SnapshotStore::open(Arc::new(store)).await
    }
}
