//! Default configuration values

/// Snapshot format version written and accepted
pub const SNAPSHOT_VERSION: u64 = 1;

/// Fixed key the snapshot is stored under
pub const SNAPSHOT_KEY: &str = "employees";

/// Key written and removed by the storage availability check
pub const STORAGE_CHECK_KEY: &str = "__storage_test__";

/// Role assigned to employees created without one
pub const DEFAULT_ROLE: &str = "EMPLOYEE";

/// Id given to records that exist only locally
pub const LOCAL_ONLY_ID: i64 = -1;

/// Default byte quota of the file-backed store (5 MiB)
pub const DEFAULT_STORAGE_QUOTA: u64 = 5 * 1024 * 1024;

/// Default registry request timeout (in seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default registry connect timeout (in seconds)
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Minimum proptest iterations
pub const MIN_PROPTEST_ITERATIONS: u32 = 100;
