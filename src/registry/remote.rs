//! Registry collaborator contract

use async_trait::async_trait;

use crate::core::employee::{Employee, EmployeeFields};
use crate::error::RemoteError;

/// Operations the directory cache needs from the registry
///
/// Every method either yields the resulting record(s) or a [`RemoteError`];
/// callers never look past success or failure.
#[async_trait]
pub trait RemoteRegistry: Send + Sync {
    /// Fetch every employee
    async fn list_all(&self) -> Result<Vec<Employee>, RemoteError>;

    /// Create an employee, returning the registry's record
    async fn create(&self, fields: &EmployeeFields) -> Result<Employee, RemoteError>;

    /// Update the employee with `id`, returning the registry's record
    async fn update(&self, id: i64, fields: &EmployeeFields) -> Result<Employee, RemoteError>;

    /// Delete the employee with `id`
    async fn delete(&self, id: i64) -> Result<(), RemoteError>;

    /// Move every resource owned by `from_id` to `to_id`
    async fn reassign_owned_resources(&self, from_id: i64, to_id: i64) -> Result<(), RemoteError>;
}
