//! Test utilities for property-based testing
//!
//! This module provides proptest generators and a scripted in-memory
//! registry for exercising the directory cache without a network.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    use crate::core::employee::Employee;
    use crate::core::snapshot::EmployeeMap;

    /// Generate an employee name (letters, digits, spaces, accents)
    pub fn employee_name() -> impl Strategy<Value = String> {
        "[A-Za-zÀ-ÿ][A-Za-zÀ-ÿ0-9 '-]{0,24}"
    }

    /// Generate a valid `#RRGGBB` color in mixed case
    pub fn hex_color() -> impl Strategy<Value = String> {
        "#[0-9A-Fa-f]{6}"
    }

    /// Generate an optional role
    pub fn role() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some("EMPLOYEE".to_string())),
            Just(Some("ADMIN".to_string())),
            "[A-Z]{3,10}".prop_map(Some),
        ]
    }

    /// Generate a map of valid employees keyed by name with distinct ids
    pub fn employee_map() -> impl Strategy<Value = EmployeeMap> {
        prop::collection::btree_map(employee_name(), (hex_color(), role()), 0..12).prop_map(
            |entries| {
                entries
                    .into_iter()
                    .enumerate()
                    .map(|(i, (name, (color, role)))| {
                        let id = i64::try_from(i).unwrap_or(i64::MAX - 1) + 1;
                        let employee = Employee {
                            id,
                            name: name.clone(),
                            color,
                            role,
                        };
                        (name, employee)
                    })
                    .collect()
            },
        )
    }
}

#[cfg(test)]
pub mod fake_registry {
    use std::collections::{BTreeMap, HashSet};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::core::employee::{Employee, EmployeeFields};
    use crate::error::RemoteError;
    use crate::registry::RemoteRegistry;

    /// A call recorded by [`FakeRegistry`]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        ListAll,
        Create(String),
        Update(i64, String),
        Delete(i64),
        Reassign(i64, i64),
    }

    /// Operations that can be scripted to fail
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub enum FailOn {
        ListAll,
        Create,
        Update(i64),
        Delete(i64),
        Reassign(i64),
    }

    /// In-memory registry with scripted failures and a call log
    pub struct FakeRegistry {
        rows: Mutex<BTreeMap<i64, Employee>>,
        next_id: Mutex<i64>,
        failures: Mutex<HashSet<FailOn>>,
        calls: Mutex<Vec<Call>>,
        list_gate: Option<Notify>,
    }

    impl FakeRegistry {
        /// Create a registry holding the given rows
        pub fn new(rows: Vec<Employee>) -> Self {
            let next_id = rows.iter().map(|e| e.id).max().unwrap_or(0) + 1;
            Self {
                rows: Mutex::new(rows.into_iter().map(|e| (e.id, e)).collect()),
                next_id: Mutex::new(next_id),
                failures: Mutex::new(HashSet::new()),
                calls: Mutex::new(Vec::new()),
                list_gate: None,
            }
        }

        /// Make `list_all` wait until [`FakeRegistry::release_list`] is called
        #[must_use]
        pub fn gated(mut self) -> Self {
            self.list_gate = Some(Notify::new());
            self
        }

        /// Let a gated `list_all` proceed
        pub fn release_list(&self) {
            if let Some(gate) = &self.list_gate {
                gate.notify_one();
            }
        }

        /// Script an operation to fail
        pub fn fail_on(&self, op: FailOn) {
            self.failures.lock().unwrap().insert(op);
        }

        /// Stop failing an operation
        pub fn heal(&self, op: &FailOn) {
            self.failures.lock().unwrap().remove(op);
        }

        /// Calls received so far
        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        /// Rows currently held
        pub fn rows(&self) -> Vec<Employee> {
            self.rows.lock().unwrap().values().cloned().collect()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn check(&self, op: FailOn) -> Result<(), RemoteError> {
            if self.failures.lock().unwrap().contains(&op) {
                return Err(RemoteError::Status {
                    url: format!("fake://{op:?}"),
                    status: 500,
                    body: "scripted failure".to_string(),
                });
            }
            Ok(())
        }

        fn apply(id: i64, fields: &EmployeeFields) -> Employee {
            Employee {
                id,
                name: fields.name.clone(),
                color: fields.color.clone().unwrap_or_else(|| "#000000".to_string()),
                role: fields.role.clone(),
            }
        }
    }

    #[async_trait]
    impl RemoteRegistry for FakeRegistry {
        async fn list_all(&self) -> Result<Vec<Employee>, RemoteError> {
            self.record(Call::ListAll);
            if let Some(gate) = &self.list_gate {
                gate.notified().await;
            }
            self.check(FailOn::ListAll)?;
            Ok(self.rows())
        }

        async fn create(&self, fields: &EmployeeFields) -> Result<Employee, RemoteError> {
            self.record(Call::Create(fields.name.clone()));
            tokio::task::yield_now().await;
            self.check(FailOn::Create)?;
            let id = {
                let mut next = self.next_id.lock().unwrap();
                let id = *next;
                *next += 1;
                id
            };
            let employee = Self::apply(id, fields);
            self.rows.lock().unwrap().insert(id, employee.clone());
            Ok(employee)
        }

        async fn update(&self, id: i64, fields: &EmployeeFields) -> Result<Employee, RemoteError> {
            self.record(Call::Update(id, fields.name.clone()));
            tokio::task::yield_now().await;
            self.check(FailOn::Update(id))?;
            let employee = Self::apply(id, fields);
            self.rows.lock().unwrap().insert(id, employee.clone());
            Ok(employee)
        }

        async fn delete(&self, id: i64) -> Result<(), RemoteError> {
            self.record(Call::Delete(id));
            self.check(FailOn::Delete(id))?;
            self.rows.lock().unwrap().remove(&id);
            Ok(())
        }

        async fn reassign_owned_resources(&self, from_id: i64, to_id: i64) -> Result<(), RemoteError> {
            self.record(Call::Reassign(from_id, to_id));
            self.check(FailOn::Reassign(from_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use crate::config::defaults;
    use crate::core::employee::is_valid_color;
    use proptest::prelude::*;
    use std::collections::HashSet;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(defaults::MIN_PROPTEST_ITERATIONS))]

        #[test]
        fn test_hex_color_generator(color in hex_color()) {
            prop_assert!(is_valid_color(&color));
        }

        #[test]
        fn test_employee_map_generator(map in employee_map()) {
            let ids: HashSet<i64> = map.values().map(|e| e.id).collect();
            prop_assert_eq!(ids.len(), map.len());
            for (name, employee) in &map {
                prop_assert_eq!(name, &employee.name);
                prop_assert!(employee.is_synced());
                prop_assert!(employee.validate().is_ok());
            }
        }
    }
}
