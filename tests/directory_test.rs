//! Integration tests for the directory cache
//!
//! Runs the cache over the HTTP registry client (against a mock server) and
//! the file-backed snapshot store.

mod common;

use std::sync::Arc;

use common::{employee_json, mount_employees, sample_rows, TestEnv, UNREACHABLE_REGISTRY};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use staffdir::core::directory::DirectoryCache;
use staffdir::infra::snapshot_store::SnapshotStore;
use staffdir::infra::store::FileStore;
use staffdir::registry::HttpRegistry;

async fn open_cache(env: &TestEnv, registry: &str) -> DirectoryCache {
    let store = FileStore::new(env.store_dir());
    let storage = SnapshotStore::open(Arc::new(store)).await;
    DirectoryCache::new(Arc::new(HttpRegistry::new(registry)), storage)
}

#[tokio::test]
async fn test_bootstrap_persists_registry_contents() {
    let server = MockServer::start().await;
    mount_employees(&server, sample_rows()).await;
    let env = TestEnv::new();

    let cache = open_cache(&env, &server.uri()).await;
    cache.bootstrap().await;

    let names: Vec<String> = cache.list().await.into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["Ana", "Bo", "Cy"]);

    let snapshot = env.read_snapshot();
    assert_eq!(snapshot["version"], 1);
    assert_eq!(snapshot["employees"]["Bo"]["id"], 2);
}

#[tokio::test]
async fn test_offline_start_uses_snapshot() {
    let server = MockServer::start().await;
    mount_employees(&server, sample_rows()).await;
    let env = TestEnv::new();
    open_cache(&env, &server.uri()).await.bootstrap().await;

    let cache = open_cache(&env, UNREACHABLE_REGISTRY).await;
    let ana = cache.get("Ana").await.expect("Ana restored from snapshot");

    assert_eq!(ana.id, 1);
    let state = cache.state().await;
    assert!(state.initialized);
    assert!(state.error.unwrap().contains("Failed to fetch employees"));
}

#[tokio::test]
async fn test_corrupt_snapshot_is_discarded() {
    let env = TestEnv::new();
    std::fs::create_dir_all(env.store_dir()).unwrap();
    std::fs::write(
        env.snapshot_path(),
        r#"{"version":1,"employees":{"Ana":{"id":1,"name":"Ana","color":"red"}}}"#,
    )
    .unwrap();

    let cache = open_cache(&env, UNREACHABLE_REGISTRY).await;

    assert!(cache.list().await.is_empty());
    assert!(!env.snapshot_path().exists());
}

#[tokio::test]
async fn test_set_color_creates_through_registry() {
    let server = MockServer::start().await;
    mount_employees(&server, vec![]).await;
    Mock::given(method("POST"))
        .and(path("/employees"))
        .and(body_json(json!({
            "name": "Dee",
            "color": "#123ABC",
            "role": "EMPLOYEE"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "employee": employee_json(12, "Dee", "#123ABC")
        })))
        .expect(1)
        .mount(&server)
        .await;
    let env = TestEnv::new();

    let cache = open_cache(&env, &server.uri()).await;
    let dee = cache.set_color("Dee", "#123ABC").await.unwrap();

    assert_eq!(dee.id, 12);
    assert_eq!(env.read_snapshot()["employees"]["Dee"]["id"], 12);
}

#[tokio::test]
async fn test_set_color_offline_keeps_local_record() {
    let env = TestEnv::new();
    let cache = open_cache(&env, UNREACHABLE_REGISTRY).await;

    let dee = cache.set_color("Dee", "#123ABC").await.unwrap();

    assert_eq!(dee.id, -1);
    assert_eq!(dee.role.as_deref(), Some("EMPLOYEE"));
    assert!(cache.state().await.error.unwrap().contains("'Dee'"));
    assert_eq!(env.read_snapshot()["employees"]["Dee"]["id"], -1);
}

#[tokio::test]
async fn test_rename_updates_registry() {
    let server = MockServer::start().await;
    mount_employees(&server, sample_rows()).await;
    Mock::given(method("PUT"))
        .and(path("/employees/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(employee_json(2, "Bea", "#00BB00")))
        .expect(1)
        .mount(&server)
        .await;
    let env = TestEnv::new();

    let cache = open_cache(&env, &server.uri()).await;
    let bea = cache.rename("Bo", "Bea").await.unwrap().unwrap();

    assert_eq!(bea.id, 2);
    assert_eq!(cache.get("Bo").await, None);
    let snapshot = env.read_snapshot();
    assert!(snapshot["employees"].get("Bo").is_none());
    assert_eq!(snapshot["employees"]["Bea"]["id"], 2);
}

#[tokio::test]
async fn test_merge_reassigns_then_deletes() {
    let server = MockServer::start().await;
    mount_employees(&server, sample_rows()).await;
    Mock::given(method("POST"))
        .and(path("/employees/reassign-weapons"))
        .and(query_param("from_employee_id", "1"))
        .and(query_param("to_employee_id", "3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/employees/reassign-weapons"))
        .and(query_param("from_employee_id", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/employees/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/employees/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let env = TestEnv::new();

    let cache = open_cache(&env, &server.uri()).await;
    let report = cache.merge(&["Ana", "Bo"], "Cy").await;

    assert_eq!(report.removed, vec!["Ana", "Bo"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "Bo");

    let names: Vec<String> = cache.list().await.into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["Cy"]);
    assert!(cache.state().await.error.unwrap().contains("Bo (#2"));
}

#[tokio::test]
async fn test_storage_disabled_when_quota_too_small() {
    let server = MockServer::start().await;
    mount_employees(&server, sample_rows()).await;
    let env = TestEnv::new();

    // Too small for even the availability check write
    let store = FileStore::new(env.store_dir()).with_quota(4);
    let storage = SnapshotStore::open(Arc::new(store)).await;
    assert!(!storage.is_available());

    let cache = DirectoryCache::new(Arc::new(HttpRegistry::new(&server.uri())), storage);
    assert_eq!(cache.list().await.len(), 3);
    assert!(!env.snapshot_path().exists());
}
