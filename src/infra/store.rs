//! Key-value byte stores
//!
//! Backing stores for the persisted snapshot. Both implementations enforce an
//! optional byte quota over everything they hold, so a write that would push
//! the total past the quota fails with [`StorageError::QuotaExceeded`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StorageError;

/// Extension of files written by [`FileStore`]
const FILE_EXTENSION: &str = "json";

/// A byte store addressed by string keys
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Write `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Remove the value under `key`; absent keys are not an error
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

fn check_quota(quota: Option<u64>, used_by_others: u64, requested: u64) -> Result<(), StorageError> {
    if let Some(quota) = quota {
        let available = quota.saturating_sub(used_by_others);
        if requested > available {
            return Err(StorageError::QuotaExceeded {
                requested,
                available,
            });
        }
    }
    Ok(())
}

/// Store that keeps one file per key in a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory holding the files
    dir: PathBuf,
    /// Maximum total bytes across all keys
    quota_bytes: Option<u64>,
}

impl FileStore {
    /// Create a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quota_bytes: None,
        }
    }

    /// Limit the total bytes the store accepts
    #[must_use]
    pub fn with_quota(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    /// Get the store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::Io {
                path: self.dir.clone(),
                error: format!("invalid key '{key}'"),
            });
        }
        Ok(self.dir.join(format!("{key}.{FILE_EXTENSION}")))
    }

    fn io_error(path: &Path, e: &std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        }
    }

    /// Total size of stored files, excluding `skip`
    async fn used_bytes(&self, skip: &Path) -> Result<u64, StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(Self::io_error(&self.dir, &e)),
        };

        let mut total = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Self::io_error(&self.dir, &e))?
        {
            let path = entry.path();
            let is_store_file = path.extension().is_some_and(|ext| ext == FILE_EXTENSION);
            if path == skip || !is_store_file {
                continue;
            }
            if let Ok(metadata) = entry.metadata().await {
                total += metadata.len();
            }
        }
        Ok(total)
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(&path, &e)),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        if self.quota_bytes.is_some() {
            let used = self.used_bytes(&path).await?;
            check_quota(self.quota_bytes, used, value.len() as u64)?;
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Self::io_error(&self.dir, &e))?;

        // Write then rename so readers never see a torn file
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| Self::io_error(&tmp, &e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| Self::io_error(&path, &e))
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(&path, &e)),
        }
    }
}

/// Store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    quota_bytes: Option<u64>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total bytes the store accepts
    #[must_use]
    pub fn with_quota(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    /// Total bytes currently held
    pub async fn used_bytes(&self) -> u64 {
        self.entries
            .lock()
            .await
            .values()
            .map(|v| v.len() as u64)
            .sum()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;
        let used: u64 = entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(_, v)| v.len() as u64)
            .sum();
        check_quota(self.quota_bytes, used, value.len() as u64)?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}
