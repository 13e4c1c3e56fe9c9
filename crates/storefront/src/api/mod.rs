//! REST client for the storefront backend.
//!
//! # Architecture
//!
//! - One [`ApiClient`] per application, cheaply cloneable (`Arc` inner)
//! - The bearer token is read from [`Storage`] on every request, so whatever
//!   the auth store persisted is what goes on the wire
//! - Any `401 Unauthorized` wipes the persisted session centrally, then
//!   notifies registered listeners, before the error reaches the caller
//! - Typed request functions are grouped per resource: [`products`],
//!   [`categories`], [`cart`], [`auth`], [`admin`]
//!
//! # Example
//!
//! ```rust,ignore
//! let api = ApiClient::new(&config, storage.clone())?;
//!
//! let listing = api.products().list("tea").await?;
//! let details = api.cart().details(&lines).await?;
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod products;
pub mod types;

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::config::StorefrontConfig;
use crate::error::{ApiError, parse_detail};
use crate::storage::{self, Storage, keys};

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use cart::CartApi;
pub use categories::CategoriesApi;
pub use products::ProductsApi;
pub use types::*;

/// Callback invoked after a 401 response wiped the persisted session.
pub type UnauthorizedListener = Arc<dyn Fn() + Send + Sync>;

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront REST API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    storage: Arc<dyn Storage>,
    unauthorized_listeners: RwLock<Vec<UnauthorizedListener>>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig, storage: Arc<dyn Storage>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_base_url.clone(),
                storage,
                unauthorized_listeners: RwLock::new(Vec::new()),
            }),
        })
    }

    /// Base URL all request paths are joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Register a listener for session expiry.
    ///
    /// Listeners run synchronously on the task that received the 401.
    pub fn on_unauthorized(&self, listener: UnauthorizedListener) {
        self.inner
            .unauthorized_listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    /// Product endpoints.
    #[must_use]
    pub const fn products(&self) -> ProductsApi<'_> {
        ProductsApi::new(self)
    }

    /// Category endpoints.
    #[must_use]
    pub const fn categories(&self) -> CategoriesApi<'_> {
        CategoriesApi::new(self)
    }

    /// Cart endpoints.
    #[must_use]
    pub const fn cart(&self) -> CartApi<'_> {
        CartApi::new(self)
    }

    /// Authentication endpoints.
    #[must_use]
    pub const fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Admin endpoints.
    #[must_use]
    pub const fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(self)
    }

    // =========================================================================
    // Request Plumbing
    // =========================================================================

    /// Start a request to `path` (relative to the base URL) with the bearer
    /// token attached when one is stored.
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.inner.base_url.join(path.trim_start_matches('/'))?;
        let mut builder = self.inner.client.request(method, url);

        if let Some(token) = self
            .inner
            .storage
            .get(keys::ACCESS_TOKEN)
            .filter(|t| !t.is_empty())
        {
            builder = builder.bearer_auth(token);
        }

        Ok(builder)
    }

    /// Send a request and decode a JSON response.
    #[instrument(skip(self, request), level = "debug")]
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(status = %status, url = %response.url(), "API response");

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            self.expire_session();
            return Err(ApiError::Unauthorized {
                detail: parse_detail(&body),
            });
        }

        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                detail: parse_detail(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    /// `GET path`.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path)?).await
    }

    /// `method path` with a JSON body.
    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(method, path)?.json(body)).await
    }

    /// Wipe the persisted session and notify listeners.
    fn expire_session(&self) {
        warn!("API returned 401 Unauthorized, clearing stored session");
        storage::forget(self.inner.storage.as_ref(), keys::ACCESS_TOKEN);
        storage::forget(self.inner.storage.as_ref(), keys::AUTH_USER);

        let listeners = self
            .inner
            .unauthorized_listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener();
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::storage::MemoryStorage;

    fn client_with(storage: Arc<dyn Storage>) -> ApiClient {
        let config = StorefrontConfig::for_api("http://localhost:8000/api").unwrap();
        ApiClient::new(&config, storage).unwrap()
    }

    #[test]
    fn test_request_joins_base_path() {
        let client = client_with(Arc::new(MemoryStorage::new()));
        let request = client
            .request(Method::GET, "/products/3")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8000/api/products/3");
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_request_attaches_stored_token() {
        let storage = Arc::new(MemoryStorage::with_values([(keys::ACCESS_TOKEN, "abc123")]));
        let client = client_with(storage);
        let request = client
            .request(Method::GET, "auth/me")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer abc123"
        );
    }

    #[test]
    fn test_expire_session_wipes_and_notifies() {
        let storage = Arc::new(MemoryStorage::with_values([
            (keys::ACCESS_TOKEN, "abc123"),
            (keys::AUTH_USER, "{}"),
            (keys::SHOPPING_CART, r#"{"1":1}"#),
        ]));
        let client = client_with(storage.clone());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        client.on_unauthorized(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        client.expire_session();

        assert!(storage.get(keys::ACCESS_TOKEN).is_none());
        assert!(storage.get(keys::AUTH_USER).is_none());
        assert!(storage.get(keys::SHOPPING_CART).is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
