//! Infrastructure layer
//!
//! Handles filesystem side effects: platform directories and the stores
//! backing the persisted snapshot. Network access lives in [`crate::registry`].

pub mod dirs;
pub mod snapshot_store;
pub mod store;
