//! Integration tests for Shine Store.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare the database and start the server
//! cargo run -p shine-store-cli -- migrate
//! cargo run -p shine-store-storefront
//!
//! # Run integration tests against it
//! cargo test -p shine-store-integration-tests -- --ignored
//! ```
//!
//! The server address defaults to `http://localhost:5000` and can be
//! overridden with `STOREFRONT_BASE_URL`.

use reqwest::Client;
use serde_json::Value;
use uuid::Uuid;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// Shared HTTP client and base URL for a test.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Create a context pointing at the configured storefront.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: storefront_base_url(),
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Insert a product and return its key.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the response has no `insertedId`.
    pub async fn create_product(&self, product: &Value) -> String {
        let resp = self
            .client
            .post(self.url("/products"))
            .json(product)
            .send()
            .await
            .expect("Failed to create product");
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

        let ack: Value = resp.json().await.expect("Failed to parse insert ack");
        ack["insertedId"]
            .as_str()
            .expect("insertedId missing")
            .to_string()
    }

    /// Delete a product, ignoring failures.
    pub async fn delete_product(&self, id: &str) {
        let _ = self
            .client
            .delete(self.url(&format!("/products/{id}")))
            .send()
            .await;
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A unique value usable as a category or email local part.
#[must_use]
pub fn unique_tag(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}
