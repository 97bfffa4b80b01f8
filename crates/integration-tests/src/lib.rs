//! Integration tests for the Metalworks storefront.
//!
//! Each test starts its own storefront on an ephemeral port, with carts
//! persisted to a temporary directory, and drives it over HTTP with a
//! cookie-aware client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p metalworks-integration-tests
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use metalworks_core::CurrencyCode;
use metalworks_storefront::catalog::Catalog;
use metalworks_storefront::config::StorefrontConfig;
use metalworks_storefront::state::AppState;
use metalworks_storefront::storage::FileStorage;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// Bundled catalog the test servers serve.
pub const CATALOG_JSON: &str = include_str!("../../storefront/catalog/products.json");

/// A storefront running in the background for the duration of a test.
pub struct TestServer {
    base_url: String,
    data_dir: TempDir,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a storefront with a fresh cart directory.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be set up.
    pub async fn start() -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to ephemeral port");
        let addr = listener.local_addr().expect("Failed to read local address");
        let base_url = format!("http://{addr}");

        let config = test_config(&base_url, data_dir.path());
        let catalog = Catalog::from_json(CATALOG_JSON, CurrencyCode::USD)
            .expect("Bundled catalog should parse");
        let storage = FileStorage::open(data_dir.path()).expect("Failed to open cart storage");
        let app = metalworks_storefront::app(AppState::new(config, catalog, Arc::new(storage)));

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url,
            data_dir,
            handle,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Directory carts are persisted to.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A client that keeps the session cookie, i.e. one visitor.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn visitor_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// POST a JSON body and return the status with the JSON response.
///
/// # Panics
///
/// Panics if the request fails or the response is not JSON.
pub async fn post(
    client: &Client,
    server: &TestServer,
    path: &str,
    body: Value,
) -> (StatusCode, Value) {
    let resp = client
        .post(server.url(path))
        .json(&body)
        .send()
        .await
        .expect("Request failed");
    let status = resp.status();
    let body = resp.json().await.expect("Response should be JSON");
    (status, body)
}

/// GET `path` and return the status with the JSON response.
///
/// # Panics
///
/// Panics if the request fails or the response is not JSON.
pub async fn get_with_status(
    client: &Client,
    server: &TestServer,
    path: &str,
) -> (StatusCode, Value) {
    let resp = client
        .get(server.url(path))
        .send()
        .await
        .expect("Request failed");
    let status = resp.status();
    (status, resp.json().await.expect("Response should be JSON"))
}

/// GET `path`, expecting a 200 with a JSON body.
///
/// # Panics
///
/// Panics if the request fails or does not return 200 with JSON.
pub async fn get(client: &Client, server: &TestServer, path: &str) -> Value {
    let (status, body) = get_with_status(client, server, path).await;
    assert_eq!(status, StatusCode::OK, "GET {path} returned {body}");
    body
}

fn test_config(base_url: &str, data_dir: &Path) -> StorefrontConfig {
    let base_url = base_url.to_string();
    let data_dir: PathBuf = data_dir.to_path_buf();
    StorefrontConfig::from_lookup(move |key| match key {
        "STOREFRONT_BASE_URL" => Some(base_url.clone()),
        "STOREFRONT_DATA_DIR" => Some(data_dir.display().to_string()),
        _ => None,
    })
    .expect("Test configuration should be valid")
}
