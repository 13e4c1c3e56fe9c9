//! Application state shared by every front end.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::StorefrontConfig;
use crate::error::ApiError;
use crate::i18n::{Catalog, I18n};
use crate::identity::{HttpScriptTransport, IdentityLoader, ScriptTransport};
use crate::media::MediaUrls;
use crate::router::Router;
use crate::storage::Storage;
use crate::stores::{AuthStore, CartStore, LocaleStore, ProductsStore};

/// Error assembling the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("API client error: {0}")]
    Api(#[from] ApiError),
    #[error("bundled message catalog is invalid: {0}")]
    Catalog(#[from] serde_json::Error),
    #[error("identity transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// All stores wired to one API client and one storage.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storage: Arc<dyn Storage>,
    api: ApiClient,
    i18n: I18n,
    auth: AuthStore,
    cart: CartStore,
    products: ProductsStore,
    router: Router,
    identity: IdentityLoader,
    media: MediaUrls,
}

impl AppState {
    /// Create the application state, loading the identity script over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built or the bundled
    /// catalog is invalid.
    pub fn new(config: StorefrontConfig, storage: Arc<dyn Storage>) -> Result<Self, StateError> {
        let transport = HttpScriptTransport::new(config.request_timeout)?;
        Self::with_script_transport(config, storage, Arc::new(transport))
    }

    /// Create the application state with a custom identity script transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the bundled
    /// catalog is invalid.
    pub fn with_script_transport(
        config: StorefrontConfig,
        storage: Arc<dyn Storage>,
        transport: Arc<dyn ScriptTransport>,
    ) -> Result<Self, StateError> {
        let api = ApiClient::new(&config, storage.clone())?;
        let catalog = Arc::new(Catalog::bundled()?);
        let i18n = I18n::new(LocaleStore::new(storage.clone()), catalog);

        let auth = AuthStore::new(api.clone(), storage.clone(), i18n.clone());
        let cart = CartStore::new(api.clone(), storage.clone(), i18n.clone());
        let products = ProductsStore::new(api.clone(), i18n.clone());
        let router = Router::new(auth.clone());
        let identity = IdentityLoader::new(transport);
        let media = MediaUrls::from_api_base(&config.api_base_url);

        cart.init_cart();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                api,
                i18n,
                auth,
                cart,
                products,
                router,
                identity,
                media,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the persisted storage.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.inner.storage
    }

    /// Get a reference to the API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the translator.
    #[must_use]
    pub fn i18n(&self) -> &I18n {
        &self.inner.i18n
    }

    /// Get a reference to the locale store.
    #[must_use]
    pub fn locale(&self) -> &LocaleStore {
        self.inner.i18n.locale_store()
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn auth(&self) -> &AuthStore {
        &self.inner.auth
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the catalog store.
    #[must_use]
    pub fn products(&self) -> &ProductsStore {
        &self.inner.products
    }

    /// Get a reference to the navigation guards.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.inner.router
    }

    /// Get a reference to the identity client loader.
    #[must_use]
    pub fn identity(&self) -> &IdentityLoader {
        &self.inner.identity
    }

    /// Get a reference to the media URL helpers.
    #[must_use]
    pub fn media(&self) -> &MediaUrls {
        &self.inner.media
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("api", &self.inner.api)
            .finish_non_exhaustive()
    }
}
