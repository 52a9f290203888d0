use std::fs;

use pageflow_runtime::{EngineError, FsPageLoader, PageLoader, PageSummary};
use serde_json::json;

fn write(dir: &tempfile::TempDir, name: &str, content: serde_json::Value) {
  fs::write(dir.path().join(name), content.to_string()).expect("failed to write page file");
}

fn pages_dir() -> tempfile::TempDir {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  write(
    &dir,
    "users.json",
    json!({ "steps": [{ "type": "form", "fields": [{ "field": "name", "type": "text" }] }] }),
  );
  write(&dir, "orders.json", json!({ "steps": [] }));
  write(
    &dir,
    "index.json",
    json!({
      "domain": { "name": "admin" },
      "pages": {
        "users": { "name": "Users", "url": "/users", "frameUrl": "/frame/users" },
        "orders": { "name": "Orders", "url": "/orders", "auth": false }
      }
    }),
  );
  dir
}

#[tokio::test]
async fn test_loads_and_caches_page_configs() {
  let dir = pages_dir();
  let loader = FsPageLoader::new(dir.path());

  let first = loader.load_page_config("users").await.unwrap();
  assert_eq!(first.steps.len(), 1);

  // Served from the cache even after the file is gone.
  fs::remove_file(dir.path().join("users.json")).unwrap();
  let second = loader.load_page_config("users").await.unwrap();
  assert!(std::sync::Arc::ptr_eq(&first, &second));

  loader.cache().invalidate("users");
  let err = loader.load_page_config("users").await.unwrap_err();
  assert!(matches!(err, EngineError::PageNotFound { page } if page == "users"));
}

#[tokio::test]
async fn test_invalid_page_is_a_config_error() {
  let dir = pages_dir();
  write(&dir, "broken.json", json!({ "steps": [{ "type": "wizard" }] }));
  let loader = FsPageLoader::new(dir.path());

  let err = loader.load_page_config("broken").await.unwrap_err();
  assert!(matches!(err, EngineError::Config(_)));
}

#[tokio::test]
async fn test_urls_and_auth_come_from_index() {
  let dir = pages_dir();
  let loader = FsPageLoader::new(dir.path());

  assert_eq!(loader.load_page_url("users").await.unwrap(), "/users");
  assert_eq!(loader.load_page_frame_url("users").await.unwrap(), "/frame/users");
  // Falls back to the page url.
  assert_eq!(loader.load_page_frame_url("orders").await.unwrap(), "/orders");

  assert!(loader.check_page_auth("users").await.unwrap());
  assert!(!loader.check_page_auth("orders").await.unwrap());
  // Pages missing from the index are allowed.
  assert!(loader.check_page_auth("other").await.unwrap());

  let err = loader.load_page_url("other").await.unwrap_err();
  assert!(matches!(err, EngineError::PageUrlMissing { kind: "page", .. }));

  assert_eq!(loader.load_domain().await.unwrap(), json!({ "name": "admin" }));
}

#[tokio::test]
async fn test_page_list_skips_index() {
  let dir = pages_dir();
  let loader = FsPageLoader::new(dir.path());

  let pages = loader.load_page_list().await.unwrap();
  assert_eq!(
    pages,
    vec![
      PageSummary {
        id: "orders".to_string(),
        name: "Orders".to_string()
      },
      PageSummary {
        id: "users".to_string(),
        name: "Users".to_string()
      },
    ]
  );
}

#[tokio::test]
async fn test_missing_index_means_no_urls() {
  let dir = tempfile::tempdir().unwrap();
  let loader = FsPageLoader::new(dir.path());

  assert!(loader.check_page_auth("any").await.unwrap());
  assert!(loader.load_page_list().await.unwrap().is_empty());
  assert_eq!(loader.load_domain().await.unwrap(), serde_json::Value::Null);
}
