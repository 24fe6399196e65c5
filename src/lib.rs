//! Staffdir - Offline-capable employee directory
//!
//! Keeps a local, persisted mirror of a remote employee registry and applies
//! edits against both, falling back to local state when the registry is
//! unreachable.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Directory cache, snapshot codec and merge logic
//! - [`registry`] - Employee registry client
//! - [`infra`] - Infrastructure layer (directories, snapshot storage)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
pub mod registry;

#[cfg(test)]
pub mod test_utils;
