//! Platform-specific directory management
//!
//! Provides the config and data directories staffdir reads and writes.
//! Follows the XDG Base Directory layout on Linux and standard locations
//! on macOS.
//!
//! Environment variables can override default directories:
//! - `STAFFDIR_CONFIG_DIR` - Override config directory
//! - `STAFFDIR_DATA_DIR` - Override data directory

use std::env;
use std::path::PathBuf;

/// Environment variable names for directory overrides
pub const ENV_CONFIG_DIR: &str = "STAFFDIR_CONFIG_DIR";
pub const ENV_DATA_DIR: &str = "STAFFDIR_DATA_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "staffdir";

/// Subdirectory holding the snapshot store
const STORE_SUBDIR: &str = "store";

/// Platform-specific directory provider for staffdir
#[derive(Debug, Clone)]
pub struct StaffdirDirs {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl StaffdirDirs {
    /// Create a new `StaffdirDirs` instance
    ///
    /// Checks environment variables first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: resolve(ENV_CONFIG_DIR, dirs::config_dir, &[".config"]),
            data_dir: resolve(ENV_DATA_DIR, dirs::data_dir, &[".local", "share"]),
        }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/staffdir` or `~/.config/staffdir`
    /// - macOS: `~/Library/Application Support/staffdir`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Get the data directory path
    ///
    /// - Linux: `$XDG_DATA_HOME/staffdir` or `~/.local/share/staffdir`
    /// - macOS: `~/Library/Application Support/staffdir`
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    /// Directory of the file-backed snapshot store
    #[must_use]
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join(STORE_SUBDIR)
    }

    /// Path to `config.toml` in the config directory
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}

impl Default for StaffdirDirs {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a directory from an environment override or the platform default
fn resolve(var: &str, platform: fn() -> Option<PathBuf>, home_fallback: &[&str]) -> PathBuf {
    if let Ok(path) = env::var(var) {
        return PathBuf::from(path);
    }

    platform().map(|p| p.join(APP_NAME)).unwrap_or_else(|| {
        // Fallback to home directory
        let base = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home_fallback
            .iter()
            .fold(base, |path, part| path.join(part))
            .join(APP_NAME)
    })
}
