//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Address nothing listens on
pub const UNREACHABLE_REGISTRY: &str = "http://127.0.0.1:1/api";

/// Isolated config and data directories for one test
pub struct TestEnv {
    /// Config directory (`STAFFDIR_CONFIG_DIR`)
    pub config_dir: TempDir,
    /// Data directory (`STAFFDIR_DATA_DIR`)
    pub data_dir: TempDir,
}

impl TestEnv {
    /// Create fresh temporary directories
    pub fn new() -> Self {
        Self {
            config_dir: TempDir::new().expect("Failed to create temp directory"),
            data_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Directory of the file-backed snapshot store
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.path().join("store")
    }

    /// Path of the persisted snapshot
    pub fn snapshot_path(&self) -> PathBuf {
        self.store_dir().join("employees.json")
    }

    /// Read and parse the persisted snapshot
    pub fn read_snapshot(&self) -> Value {
        let content = std::fs::read_to_string(self.snapshot_path()).expect("Failed to read snapshot");
        serde_json::from_str(&content).expect("Snapshot is not JSON")
    }

    /// Write `config.toml`
    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_dir.path().join("config.toml"), content)
            .expect("Failed to write config file");
    }

    /// Run the staffdir binary against `registry`
    pub fn run(&self, registry: &str, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_staffdir"))
            .env("STAFFDIR_CONFIG_DIR", self.config_dir.path())
            .env("STAFFDIR_DATA_DIR", self.data_dir.path())
            .env("STAFFDIR_REGISTRY_URL", registry)
            .env_remove("RUST_LOG")
            .args(args)
            .output()
            .expect("Failed to execute staffdir")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON body of an employee row
pub fn employee_json(id: i64, name: &str, color: &str) -> Value {
    json!({ "id": id, "name": name, "color": color, "role": "EMPLOYEE" })
}

/// Serve `rows` from `GET /employees`
pub async fn mount_employees(server: &MockServer, rows: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/employees"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(rows)))
        .mount(server)
        .await;
}

/// Standard three-row registry
pub fn sample_rows() -> Vec<Value> {
    vec![
        employee_json(1, "Ana", "#AA0000"),
        employee_json(2, "Bo", "#00BB00"),
        employee_json(3, "Cy", "#0000CC"),
    ]
}

/// Stdout as a string
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Stderr as a string
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
