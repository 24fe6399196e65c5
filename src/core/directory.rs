//! Employee directory cache
//!
//! In-memory mirror of the employee registry, persisted as a snapshot so it
//! is usable before (or without) the network.
//!
//! # Lifecycle
//!
//! The first read or write spawns the bootstrap task: the stored snapshot is
//! published as tentative data, then the registry is listed and replaces the
//! whole map. Readers are held at the [`InitGate`] until that first sync
//! attempt settles, whether it succeeded or not.
//!
//! # Writes
//!
//! Writes go to the registry first. The registry's record is cached on
//! success; on failure a locally built record is cached instead and the
//! error is recorded in [`DirectoryState::error`]. Remote and storage
//! failures never surface as errors from these methods. Operations on the
//! same name are serialized through [`KeyLocks`], and a full sync excludes
//! every other write.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::config::defaults;
use crate::core::employee::{validate_color, Employee, EmployeeFields};
use crate::core::gate::InitGate;
use crate::core::key_locks::KeyLocks;
use crate::core::merge::{self, MergeReport};
use crate::core::snapshot::EmployeeMap;
use crate::error::{RemoteError, ValidationError};
use crate::infra::snapshot_store::{SaveOutcome, SnapshotStore};
use crate::registry::RemoteRegistry;

/// Point-in-time view of the cache
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryState {
    /// Employees keyed by name
    pub employees: EmployeeMap,
    /// Whether the bootstrap or any operation is in flight
    pub loading: bool,
    /// Last recorded remote failure
    pub error: Option<String>,
    /// Whether the first sync attempt has settled
    pub initialized: bool,
}

/// Mutable cache contents
#[derive(Debug, Default)]
struct Entries {
    employees: EmployeeMap,
    error: Option<String>,
}

impl Entries {
    /// Insert `employee` under `key`, evicting any other key with the same id
    fn insert(&mut self, key: &str, employee: Employee) {
        if employee.is_synced() {
            self.employees
                .retain(|name, existing| name == key || existing.id != employee.id);
        }
        self.employees.insert(key.to_string(), employee);
    }
}

/// Decrements the in-flight counter on drop
struct Busy(Arc<AtomicUsize>);

impl Busy {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(Arc::clone(counter))
    }
}

impl Drop for Busy {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// State shared between the cache and its bootstrap task
#[derive(Clone)]
struct Shared {
    registry: Arc<dyn RemoteRegistry>,
    storage: SnapshotStore,
    entries: Arc<RwLock<Entries>>,
    /// Shared by writes, exclusive for full syncs
    sync_lock: Arc<RwLock<()>>,
    /// Orders snapshot writes
    persist_lock: Arc<Mutex<()>>,
}

impl Shared {
    /// Publish the stored snapshot, then replace it with the registry's view
    async fn initial_sync(&self) {
        let stored = self.storage.load_employees().await;
        if !stored.is_empty() {
            tracing::debug!("Loaded {} employees from snapshot", stored.len());
            self.entries.write().await.employees = stored;
        }

        match self.full_sync().await {
            Ok(count) => tracing::info!("Directory initialized with {} employees", count),
            Err(e) => tracing::warn!("Directory initialized from local data only: {}", e),
        }
    }

    async fn full_sync(&self) -> Result<usize, RemoteError> {
        let _sync = self.sync_lock.write().await;

        match self.registry.list_all().await {
            Ok(list) => {
                let count = {
                    let mut entries = self.entries.write().await;
                    entries.employees.clear();
                    for employee in list {
                        let key = employee.name.clone();
                        entries.insert(&key, employee);
                    }
                    entries.error = None;
                    entries.employees.len()
                };
                self.persist().await;
                Ok(count)
            }
            Err(e) => {
                self.record_error(format!("Failed to fetch employees: {e}"))
                    .await;
                Err(e)
            }
        }
    }

    async fn record_error(&self, message: String) {
        self.entries.write().await.error = Some(message);
    }

    /// Write the current map to storage
    async fn persist(&self) -> SaveOutcome {
        let _order = self.persist_lock.lock().await;
        let employees = self.entries.read().await.employees.clone();
        self.storage.save_employees(&employees).await
    }
}

/// Versioned, persisted mirror of the employee registry
pub struct DirectoryCache {
    shared: Shared,
    gate: Arc<InitGate>,
    locks: KeyLocks,
    in_flight: Arc<AtomicUsize>,
}

impl std::fmt::Debug for DirectoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryCache")
            .field("storage", &self.shared.storage)
            .field("initialized", &self.gate.is_open())
            .finish_non_exhaustive()
    }
}

impl DirectoryCache {
    /// Create a cache over a registry and a snapshot store
    ///
    /// Nothing is loaded until the first operation or [`Self::bootstrap`].
    pub fn new(registry: Arc<dyn RemoteRegistry>, storage: SnapshotStore) -> Self {
        Self {
            shared: Shared {
                registry,
                storage,
                entries: Arc::new(RwLock::new(Entries::default())),
                sync_lock: Arc::new(RwLock::new(())),
                persist_lock: Arc::new(Mutex::new(())),
            },
            gate: Arc::new(InitGate::new()),
            locks: KeyLocks::new(),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Start the one-time bootstrap if needed and wait for it to settle
    ///
    /// The bootstrap runs on its own task, so dropping this future does not
    /// abandon the first sync.
    pub async fn bootstrap(&self) {
        if self.gate.try_begin() {
            let shared = self.shared.clone();
            let busy = Busy::enter(&self.in_flight);
            let open = InitGate::open_on_drop(&self.gate);
            tokio::spawn(async move {
                let _busy = busy;
                let _open = open;
                shared.initial_sync().await;
            });
        }

        self.gate.wait().await;
    }

    /// Wait until the bootstrap has run once, starting it if needed
    pub async fn ready(&self) {
        if !self.gate.is_open() {
            self.bootstrap().await;
        }
    }

    /// Whether the first sync attempt has settled
    pub fn is_initialized(&self) -> bool {
        self.gate.is_open()
    }

    /// Look up an employee by name
    pub async fn get(&self, name: &str) -> Option<Employee> {
        self.ready().await;
        self.shared.entries.read().await.employees.get(name).cloned()
    }

    /// Every employee, sorted by name
    pub async fn list(&self) -> Vec<Employee> {
        self.ready().await;
        self.shared.entries
            .read()
            .await
            .employees
            .values()
            .cloned()
            .collect()
    }

    /// Current state, without waiting for the bootstrap
    pub async fn state(&self) -> DirectoryState {
        let entries = self.shared.entries.read().await;
        DirectoryState {
            employees: entries.employees.clone(),
            loading: self.in_flight.load(Ordering::Acquire) > 0,
            error: entries.error.clone(),
            initialized: self.gate.is_open(),
        }
    }

    /// Forget the recorded error
    pub async fn clear_error(&self) {
        self.shared.entries.write().await.error = None;
    }

    /// Set an employee's color, creating the employee if unknown
    ///
    /// Returns the record now cached under `name`. Only a malformed color or
    /// empty name is an error, and neither reaches the registry.
    pub async fn set_color(&self, name: &str, color: &str) -> Result<Employee, ValidationError> {
        check_name(name)?;
        validate_color(color)?;

        self.ready().await;
        let _busy = Busy::enter(&self.in_flight);
        let _sync = self.shared.sync_lock.read().await;
        let _guard = self.locks.lock([name]).await;

        let existing = self.shared.entries.read().await.employees.get(name).cloned();
        let role = existing
            .as_ref()
            .map_or(defaults::DEFAULT_ROLE, Employee::role_or_default)
            .to_string();
        let fields = EmployeeFields {
            name: name.to_string(),
            color: Some(color.to_string()),
            role: Some(role.clone()),
        };

        let result = match existing.as_ref().filter(|e| e.is_synced()) {
            Some(current) => self.shared.registry.update(current.id, &fields).await,
            None => self.shared.registry.create(&fields).await,
        };

        let employee = match result {
            Ok(employee) => employee,
            Err(e) => {
                tracing::warn!("Failed to sync color of '{}', keeping it locally: {}", name, e);
                self.shared.record_error(format!("Failed to update employee '{name}': {e}"))
                    .await;
                Employee {
                    id: existing.map_or(defaults::LOCAL_ONLY_ID, |e| e.id),
                    name: name.to_string(),
                    color: color.to_string(),
                    role: Some(role),
                }
            }
        };

        self.shared.entries.write().await.insert(name, employee.clone());
        self.shared.persist().await;
        Ok(employee)
    }

    /// Move an employee to a new name, keeping its id
    ///
    /// Returns `None` when `old_name` is not cached. The local rename happens
    /// even when the registry update fails.
    pub async fn rename(
        &self,
        old_name: &str,
        new_name: &str,
    ) -> Result<Option<Employee>, ValidationError> {
        check_name(new_name)?;

        self.ready().await;
        let _busy = Busy::enter(&self.in_flight);
        let _sync = self.shared.sync_lock.read().await;
        let _guard = self.locks.lock([old_name, new_name]).await;

        let Some(current) = self.shared.entries.read().await.employees.get(old_name).cloned() else {
            tracing::debug!("Rename of unknown employee '{}' ignored", old_name);
            return Ok(None);
        };
        if old_name == new_name {
            return Ok(Some(current));
        }

        let renamed = Employee {
            name: new_name.to_string(),
            ..current
        };

        let employee = if renamed.is_synced() {
            match self.shared.registry.update(renamed.id, &renamed.fields()).await {
                Ok(employee) => employee,
                Err(e) => {
                    tracing::warn!(
                        "Failed to rename '{}' on the registry, renaming locally: {}",
                        old_name,
                        e
                    );
                    self.shared.record_error(format!("Failed to rename employee '{old_name}': {e}"))
                        .await;
                    renamed
                }
            }
        } else {
            renamed
        };

        {
            let mut entries = self.shared.entries.write().await;
            entries.employees.remove(old_name);
            entries.insert(new_name, employee.clone());
        }
        self.shared.persist().await;
        Ok(Some(employee))
    }

    /// Fold `names` into `target_name`
    ///
    /// Each synced source has its resources reassigned to the target and is
    /// then deleted on the registry. Every source except the target leaves
    /// the cache regardless of remote outcome; the report lists the sources
    /// whose registry rows may have survived.
    pub async fn merge<S: AsRef<str>>(&self, names: &[S], target_name: &str) -> MergeReport {
        self.ready().await;
        let _busy = Busy::enter(&self.in_flight);
        let _sync = self.shared.sync_lock.read().await;

        let source_names: BTreeSet<&str> = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| *name != target_name)
            .collect();
        let _guard = self
            .locks
            .lock(source_names.iter().copied().chain([target_name]))
            .await;

        let (target, sources) = {
            let entries = self.shared.entries.read().await;
            let Some(target) = entries.employees.get(target_name).cloned() else {
                tracing::debug!("Merge into unknown employee '{}' ignored", target_name);
                return MergeReport::noop(target_name);
            };
            let sources: Vec<Employee> = source_names
                .iter()
                .filter_map(|name| entries.employees.get(*name).cloned())
                .collect();
            (target, sources)
        };

        let failures = merge::retire_sources(self.shared.registry.as_ref(), &target, &sources).await;

        let mut report = MergeReport {
            target: target_name.to_string(),
            removed: Vec::new(),
            failures,
        };
        {
            let mut entries = self.shared.entries.write().await;
            for name in &source_names {
                if entries.employees.remove(*name).is_some() {
                    report.removed.push((*name).to_string());
                }
            }
            if let Some(summary) = report.summary() {
                tracing::warn!("{}", summary);
                entries.error = Some(summary);
            }
        }

        self.shared.persist().await;
        report
    }

    /// Delete an employee
    ///
    /// Returns the removed record, or `None` if `name` was not cached. The
    /// entry leaves the cache even when the registry delete fails.
    pub async fn remove(&self, name: &str) -> Option<Employee> {
        self.ready().await;
        let _busy = Busy::enter(&self.in_flight);
        let _sync = self.shared.sync_lock.read().await;
        let _guard = self.locks.lock([name]).await;

        let current = self.shared.entries.read().await.employees.get(name).cloned()?;

        if current.is_synced() {
            if let Err(e) = self.shared.registry.delete(current.id).await {
                tracing::warn!("Failed to delete '{}' on the registry: {}", name, e);
                self.shared.record_error(format!("Failed to delete employee '{name}': {e}"))
                    .await;
            }
        }

        self.shared.entries.write().await.employees.remove(name);
        self.shared.persist().await;
        Some(current)
    }

    /// Replace the cache with the registry's contents
    ///
    /// Local-only records are dropped. On failure the cache is left as is
    /// and the error is both recorded and returned.
    pub async fn refresh(&self) -> Result<usize, RemoteError> {
        self.ready().await;
        let _busy = Busy::enter(&self.in_flight);
        self.shared.full_sync().await
    }
}

fn check_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}
