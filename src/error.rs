//! Error types for staffdir
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Local validation errors
///
/// Raised before any network or storage access takes place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Color is not of the form `#RRGGBB`
    #[error("Invalid color '{color}': expected #RRGGBB")]
    InvalidColor { color: String },

    /// Employee name is empty or whitespace
    #[error("Employee name cannot be empty")]
    EmptyName,
}

/// Snapshot decoding errors
///
/// Any of these discards the whole snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Bytes are not a well-formed snapshot document
    #[error("Failed to parse snapshot: {0}")]
    Parse(String),

    /// Snapshot written by another format version
    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u64, expected: u64 },

    /// A contained record failed validation
    #[error("Invalid employee record '{key}': {reason}")]
    InvalidEntity { key: String, reason: String },
}

/// Persistent store errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Write rejected because the store is full
    #[error("Storage quota exceeded: {requested} bytes requested, {available} available")]
    QuotaExceeded { requested: u64, available: u64 },

    /// IO error
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },
}

impl StorageError {
    /// Whether this error is a quota/size failure
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

/// Remote registry errors
#[derive(Error, Debug, Clone)]
pub enum RemoteError {
    /// Transport failure
    #[error("Network error calling '{url}': {error}")]
    Network { url: String, error: String },

    /// Non-success HTTP status
    #[error("Registry returned HTTP {status} for '{url}': {body}")]
    Status { url: String, status: u16, body: String },

    /// Response body could not be decoded
    #[error("Failed to decode registry response from '{url}': {error}")]
    Decode { url: String, error: String },
}

/// Top-level staffdir error type
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Snapshot error
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Remote registry error
    #[error("Registry error: {0}")]
    Remote(#[from] RemoteError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
