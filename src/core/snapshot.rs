//! Snapshot codec
//!
//! The snapshot is the versioned JSON document persisted for the cache:
//!
//! ```json
//! { "version": 1, "employees": { "<name>": { "id": 1, "name": "...", "color": "#RRGGBB" } } }
//! ```
//!
//! Decoding is all-or-nothing. One bad record rejects the whole document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::defaults::SNAPSHOT_VERSION;
use crate::core::employee::Employee;
use crate::error::SnapshotError;

/// Employees keyed by name
pub type EmployeeMap = BTreeMap<String, Employee>;

/// Persisted snapshot document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    /// Snapshot format version
    pub version: u64,

    /// Employees keyed by name
    pub employees: EmployeeMap,
}

impl Snapshot {
    /// Create a snapshot at the current format version
    pub fn new(employees: EmployeeMap) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            employees,
        }
    }
}

/// Serialize a map of employees into snapshot bytes
pub fn encode(employees: &EmployeeMap) -> Vec<u8> {
    // String keys and plain fields cannot fail to serialize
    serde_json::to_vec(&Snapshot::new(employees.clone())).unwrap_or_default()
}

/// Read a document version, accepting integral floats such as `1.0`
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
fn document_version(value: &Value) -> Option<u64> {
    if let Some(version) = value.as_u64() {
        return Some(version);
    }
    let float = value.as_f64()?;
    let version = float as u64;
    (version as f64 == float).then_some(version)
}

/// Parse and validate snapshot bytes
pub fn decode(bytes: &[u8]) -> Result<EmployeeMap, SnapshotError> {
    let document: Value =
        serde_json::from_slice(bytes).map_err(|e| SnapshotError::Parse(e.to_string()))?;

    let Value::Object(mut fields) = document else {
        return Err(SnapshotError::Parse("snapshot is not an object".to_string()));
    };

    let version = fields.get("version").and_then(document_version);
    if version != Some(SNAPSHOT_VERSION) {
        return Err(SnapshotError::UnsupportedVersion {
            found: version.unwrap_or(0),
            expected: SNAPSHOT_VERSION,
        });
    }

    let Some(Value::Object(records)) = fields.remove("employees") else {
        return Err(SnapshotError::Parse(
            "'employees' is missing or not a map".to_string(),
        ));
    };

    let mut employees = EmployeeMap::new();
    for (key, record) in records {
        let employee: Employee =
            serde_json::from_value(record).map_err(|e| SnapshotError::InvalidEntity {
                key: key.clone(),
                reason: e.to_string(),
            })?;
        employee
            .validate()
            .map_err(|reason| SnapshotError::InvalidEntity {
                key: key.clone(),
                reason,
            })?;
        employees.insert(key, employee);
    }

    Ok(employees)
}
