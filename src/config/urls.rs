//! Registry URLs and endpoint paths

/// Default registry base URL
pub const DEFAULT_REGISTRY: &str = "http://localhost:3000/api";

/// Employee collection endpoint
pub const EMPLOYEES_PATH: &str = "/employees";

/// Owned-resource reassignment endpoint
pub const REASSIGN_PATH: &str = "/employees/reassign-weapons";
