//! Common test utilities for kisses-service integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use kisses_service::{create_router, AppState, ServiceConfig};
use kisses_store::SqliteLedger;

/// Shared secret configured into every test harness.
pub const ADMIN_SECRET: &str = "test-admin-secret";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database and defaults.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a harness after letting the caller adjust the configuration
    /// (provider base URL, rate limits, ...).
    pub async fn with_config(adjust: impl FnOnce(&mut ServiceConfig)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let database_path = temp_dir
            .path()
            .join("kisses.db")
            .to_string_lossy()
            .to_string();

        let mut config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            database_path,
            admin_secret: Some(ADMIN_SECRET.into()),
            // Unroutable unless a test points this at a mock server.
            provider_base_url: "http://127.0.0.1:9".into(),
            provider_api_key: Some("test-provider-key".into()),
            ..ServiceConfig::default()
        };
        adjust(&mut config);

        let ledger = SqliteLedger::open(&config.database_path, config.amounts)
            .await
            .expect("Failed to open ledger");

        let state = AppState::new(Arc::new(ledger), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
        }
    }

    /// A valid charge body for `POST /credit`.
    pub fn charge_body(creator: &str, model: &str, address: &str) -> serde_json::Value {
        serde_json::json!({
            "admin_secret": ADMIN_SECRET,
            "model_creator": creator,
            "model_name": model,
            "user_address": address,
        })
    }

    /// Initialize a consumer account via its first balance read.
    pub async fn init_consumer(&self, address: &str) -> i64 {
        let response = self.server.get(&format!("/credit?user_id={address}")).await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["kisses"].as_i64().expect("kisses balance")
    }
}
