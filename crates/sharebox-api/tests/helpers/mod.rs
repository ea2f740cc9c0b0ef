//! Test helpers: build AppState and router for integration tests.
//!
//! The test app runs on the in-memory record store and local storage in a
//! temp directory; no external services are required. Run with
//! `cargo test -p sharebox-api`.

#![allow(dead_code)]

pub mod auth;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use sharebox_api::constants;
use sharebox_api::setup::routes;
use sharebox_api::state::AppState;
use sharebox_core::{BaseConfig, Config, ShareboxConfig, StorageBackend};
use sharebox_db::{FileStore, MemoryFileStore};
use sharebox_storage::{LocalStorage, Storage};
use std::sync::Arc;
use tempfile::TempDir;

use self::auth::TestUser;

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<dyn Storage>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Setup test app with in-memory record store and temp-dir local storage.
pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(
            temp_dir.path(),
            "http://localhost:3000/files".to_string(),
        )
        .await
        .expect("Failed to create local storage"),
    );

    let store: Arc<dyn FileStore> = Arc::new(MemoryFileStore::new());
    let config = create_test_config();

    let state = Arc::new(AppState::new(store, storage.clone(), config.clone()));

    let app = routes::setup_routes(&config, state)
        .await
        .expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        _temp_dir: temp_dir,
    }
}

/// Upload a file as `user`; returns the parsed upload response.
pub async fn upload_file(
    server: &TestServer,
    user: &TestUser,
    filename: &str,
    mime_type: &str,
    data: Vec<u8>,
) -> serde_json::Value {
    let part = Part::bytes(data).file_name(filename).mime_type(mime_type);
    let multipart = MultipartForm::new().add_part("file", part);

    let response = server
        .post(&api_path("/files"))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .multipart(multipart)
        .await;

    assert_eq!(response.status_code(), 201, "upload failed: {}", response.text());
    response.json()
}

fn create_test_config() -> Config {
    let base = BaseConfig {
        server_port: 3000,
        cors_origins: vec!["*".to_string()],
        db_max_connections: 5,
        db_timeout_seconds: 30,
        jwt_secret: auth::TEST_JWT_SECRET.to_string(),
        environment: "test".to_string(),
    };

    Config(Box::new(ShareboxConfig {
        base,
        database_url: "postgresql://localhost/sharebox-test".to_string(),
        storage_backend: Some(StorageBackend::Local),
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: Some("/tmp/sharebox-test".to_string()),
        local_storage_base_url: Some("http://localhost:3000/files".to_string()),
        max_file_size_bytes: 10 * 1024 * 1024,
        public_base_url: "http://localhost:3000".to_string(),
    }))
}
