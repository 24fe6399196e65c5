//! Core directory logic
//!
//! # Submodules
//!
//! - [`employee`] - Employee records and color validation
//! - [`snapshot`] - Versioned snapshot encoding
//! - [`gate`] - One-shot initialization gate
//! - [`key_locks`] - Per-name operation locks
//! - [`merge`] - Merge coordination and reporting
//! - [`directory`] - The directory cache
//! - [`global_config`] - Global configuration management

pub mod directory;
pub mod employee;
pub mod gate;
pub mod global_config;
pub mod key_locks;
pub mod merge;
pub mod snapshot;
