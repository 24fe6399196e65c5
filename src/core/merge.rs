//! Employee merge coordination
//!
//! Merging folds source employees into a target: each source's owned
//! resources are reassigned to the target, then the source is deleted from
//! the registry. Every step is attempted across the whole batch and every
//! failure is collected into a [`MergeReport`].

use std::fmt;

use crate::core::employee::Employee;
use crate::registry::RemoteRegistry;

/// Remote step of a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStep {
    /// Moving owned resources to the target
    Reassign,
    /// Deleting the source from the registry
    Delete,
}

impl fmt::Display for MergeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reassign => write!(f, "reassign"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// A source whose remote merge step failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeFailure {
    /// Source name
    pub name: String,
    /// Source registry id
    pub id: i64,
    /// Step that failed
    pub step: MergeStep,
    /// Error message
    pub error: String,
}

/// Outcome of a merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Target name
    pub target: String,
    /// Sources removed from the cache
    pub removed: Vec<String>,
    /// Remote steps that failed; those registry rows may still exist
    pub failures: Vec<MergeFailure>,
}

impl MergeReport {
    /// Report for a merge that did nothing
    pub fn noop(target: &str) -> Self {
        Self {
            target: target.to_string(),
            ..Self::default()
        }
    }

    /// Whether every remote step succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// One-line description of the diverged sources, if any
    pub fn summary(&self) -> Option<String> {
        if self.is_clean() {
            return None;
        }

        let members: Vec<String> = self
            .failures
            .iter()
            .map(|f| format!("{} (#{}, {} failed)", f.name, f.id, f.step))
            .collect();
        Some(format!(
            "Merge into '{}' incomplete on the registry: {}",
            self.target,
            members.join(", ")
        ))
    }
}

/// Reassign and delete each source on the registry
///
/// Reassignment is always attempted before the delete of the same source.
/// A failed step is recorded and the remaining steps still run.
pub async fn retire_sources(
    registry: &dyn RemoteRegistry,
    target: &Employee,
    sources: &[Employee],
) -> Vec<MergeFailure> {
    let mut failures = Vec::new();

    for source in sources.iter().filter(|s| s.is_synced() && s.id != target.id) {
        let fail = |step: MergeStep, error: String| MergeFailure {
            name: source.name.clone(),
            id: source.id,
            step,
            error,
        };

        if target.is_synced() {
            if let Err(e) = registry
                .reassign_owned_resources(source.id, target.id)
                .await
            {
                tracing::warn!("Failed to reassign resources of '{}': {}", source.name, e);
                failures.push(fail(MergeStep::Reassign, e.to_string()));
            }
        } else {
            tracing::warn!(
                "Cannot reassign '{}' to unsynced target '{}'",
                source.name,
                target.name
            );
            failures.push(fail(
                MergeStep::Reassign,
                format!("target '{}' is not registered", target.name),
            ));
        }

        if let Err(e) = registry.delete(source.id).await {
            tracing::warn!("Failed to delete '{}' after merge: {}", source.name, e);
            failures.push(fail(MergeStep::Delete, e.to_string()));
            continue;
        }

        tracing::debug!("Merged '{}' into '{}'", source.name, target.name);
    }

    failures
}
