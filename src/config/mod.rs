//! Configuration constants
//!
//! - [`defaults`] - Snapshot format, storage and timeout defaults
//! - [`urls`] - Registry base URL and endpoint paths

pub mod defaults;
pub mod urls;
