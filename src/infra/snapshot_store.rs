//! Persistent snapshot storage
//!
//! Wraps a [`KeyValueStore`] that may be missing or broken. Persistence is
//! best-effort: nothing here returns an error to the caller. Failures are
//! logged and reported through [`SaveOutcome`].

use std::sync::Arc;

use crate::config::defaults;
use crate::core::snapshot::{self, EmployeeMap};
use crate::infra::store::KeyValueStore;

/// Result of a save attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written on the first attempt
    Saved,
    /// Written after clearing the old snapshot to free quota
    SavedAfterClear,
    /// Storage is unavailable; nothing was written
    Skipped,
    /// Write failed and was swallowed
    Failed,
}

/// Best-effort snapshot persistence
#[derive(Clone)]
pub struct SnapshotStore {
    /// Backing store, `None` when unavailable
    store: Option<Arc<dyn KeyValueStore>>,
    /// Key the snapshot is stored under
    key: String,
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("available", &self.is_available())
            .field("key", &self.key)
            .finish()
    }
}

impl SnapshotStore {
    /// Check `store` once and wrap it
    ///
    /// A store that cannot complete a throwaway write and delete is treated
    /// as unavailable for the lifetime of the adapter.
    pub async fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let available = Self::check_available(store.as_ref()).await;
        Self {
            store: available.then_some(store),
            key: defaults::SNAPSHOT_KEY.to_string(),
        }
    }

    /// Adapter with no backing store
    pub fn unavailable() -> Self {
        Self {
            store: None,
            key: defaults::SNAPSHOT_KEY.to_string(),
        }
    }

    async fn check_available(store: &dyn KeyValueStore) -> bool {
        let key = defaults::STORAGE_CHECK_KEY;
        let result = match store.set(key, key.as_bytes()).await {
            Ok(()) => store.remove(key).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Persistent storage is not available: {}", e);
                false
            }
        }
    }

    /// Whether the startup availability check succeeded
    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// Read the raw snapshot bytes
    pub async fn load(&self) -> Option<Vec<u8>> {
        let Some(store) = &self.store else {
            tracing::debug!("Storage unavailable, skipping load");
            return None;
        };

        match store.get(&self.key).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Failed to read snapshot: {}", e);
                None
            }
        }
    }

    /// Write raw snapshot bytes
    ///
    /// On a quota failure the stored snapshot is cleared and the write is
    /// retried exactly once.
    pub async fn save(&self, bytes: &[u8]) -> SaveOutcome {
        let Some(store) = &self.store else {
            tracing::debug!("Storage unavailable, skipping save");
            return SaveOutcome::Skipped;
        };

        match store.set(&self.key, bytes).await {
            Ok(()) => SaveOutcome::Saved,
            Err(e) if e.is_quota_exceeded() => {
                tracing::warn!("{}; clearing snapshot and retrying", e);
                self.clear().await;
                match store.set(&self.key, bytes).await {
                    Ok(()) => SaveOutcome::SavedAfterClear,
                    Err(retry_error) => {
                        tracing::error!("Failed to save snapshot after retry: {}", retry_error);
                        SaveOutcome::Failed
                    }
                }
            }
            Err(e) => {
                tracing::error!("Failed to save snapshot: {}", e);
                SaveOutcome::Failed
            }
        }
    }

    /// Remove the stored snapshot
    pub async fn clear(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.remove(&self.key).await {
                tracing::error!("Failed to clear snapshot: {}", e);
            }
        }
    }

    /// Load and decode the stored employees
    ///
    /// A snapshot that fails validation is cleared and treated as absent.
    pub async fn load_employees(&self) -> EmployeeMap {
        let Some(bytes) = self.load().await else {
            return EmployeeMap::new();
        };

        match snapshot::decode(&bytes) {
            Ok(employees) => employees,
            Err(e) => {
                tracing::warn!("Discarding stored snapshot: {}", e);
                self.clear().await;
                EmployeeMap::new()
            }
        }
    }

    /// Encode and store the given employees
    pub async fn save_employees(&self, employees: &EmployeeMap) -> SaveOutcome {
        self.save(&snapshot::encode(employees)).await
    }
}
