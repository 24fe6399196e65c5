//! Employee registry client
//!
//! The registry is the long-term source of truth for employees. The cache
//! talks to it through the [`RemoteRegistry`] trait; [`HttpRegistry`] is the
//! REST implementation.

pub mod client;
pub mod remote;

pub use client::HttpRegistry;
pub use remote::RemoteRegistry;
