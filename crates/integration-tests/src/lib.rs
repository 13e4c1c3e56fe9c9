//! Integration tests for Bazaar.
//!
//! Every test drives a full [`AppState`] against a [`wiremock`] server
//! standing in for the backend API, so the stores, the API client and the
//! localization layer are exercised together.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_reconciliation` - Cart mutations and server-side repricing
//! - `auth_session` - Session restore, login and logout
//! - `products_catalog` - Listing, filtering and the detail cache
//! - `router_guards` - Navigation guards against a live session
//! - `admin_api` - Admin endpoints and multipart uploads
//! - `identity_loader` - Identity client loading per locale

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bazaar_storefront::AppState;
use bazaar_storefront::config::StorefrontConfig;
use bazaar_storefront::identity::{IdentityError, ScriptTransport};
use bazaar_storefront::storage::{MemoryStorage, Storage};
use serde_json::{Value, json};
use url::Url;
use wiremock::MockServer;

/// A mock backend plus an application wired to it.
pub struct TestContext {
    pub server: MockServer,
    pub storage: Arc<MemoryStorage>,
    pub scripts: Arc<FakeScripts>,
    pub state: AppState,
}

impl TestContext {
    /// Start a mock backend with empty client storage.
    ///
    /// # Panics
    ///
    /// Panics if the application state cannot be built.
    pub async fn new() -> Self {
        Self::with_storage(MemoryStorage::new()).await
    }

    /// Start a mock backend with pre-populated client storage.
    ///
    /// # Panics
    ///
    /// Panics if the application state cannot be built.
    pub async fn with_storage(storage: MemoryStorage) -> Self {
        let server = MockServer::start().await;
        let config = StorefrontConfig::for_api(&format!("{}/api", server.uri()))
            .expect("Failed to build config");
        let storage = Arc::new(storage);
        let scripts = Arc::new(FakeScripts::default());

        let state = AppState::with_script_transport(
            config,
            storage.clone() as Arc<dyn Storage>,
            scripts.clone(),
        )
        .expect("Failed to build application state");

        Self {
            server,
            storage,
            scripts,
            state,
        }
    }
}

/// Script transport that serves a canned body and counts fetches.
#[derive(Debug, Default)]
pub struct FakeScripts {
    calls: AtomicUsize,
}

impl FakeScripts {
    /// Number of fetches so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScriptTransport for FakeScripts {
    async fn fetch(&self, url: &Url) -> Result<String, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(format!("/* identity client from {url} */"))
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Product record as the backend returns it.
#[must_use]
pub fn product_json(id: i64, name: &str, price: &str, category_id: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "name_ru": format!("{name} (ru)"),
        "name_en": name,
        "description": null,
        "price": price,
        "category_id": category_id,
        "image_url": format!("/uploads/{id}.png"),
        "images": [],
        "created_at": "2026-10-01T09:30:00",
        "category": null
    })
}

/// Category record as the backend returns it.
#[must_use]
pub fn category_json(id: i64, name: &str, slug: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "name_ru": null,
        "name_en": null,
        "slug": slug
    })
}

/// Account record as the backend returns it.
#[must_use]
pub fn user_json(id: i64, email: &str, role: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "full_name": "Test User",
        "provider": "local",
        "role": role,
        "created_at": "2026-09-01T00:00:00"
    })
}

/// Token response for login, registration and Google sign-in.
#[must_use]
pub fn auth_json(token: &str, user: Value) -> Value {
    json!({
        "access_token": token,
        "token_type": "bearer",
        "user": user
    })
}
