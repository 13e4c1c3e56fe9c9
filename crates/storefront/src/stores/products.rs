//! Catalog store: product listings, categories and the category filter.
//!
//! Single products and the category list are cached for 5 minutes using
//! `moka`. Listings are not cached since they depend on the search query.

use std::sync::Arc;
use std::time::Duration;

use bazaar_core::{CategoryId, ProductId};
use moka::future::Cache;
use tokio::sync::watch;
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheValue};
use crate::api::{ApiClient, Category, Product};
use crate::error::{ApiError, error_message};
use crate::i18n::I18n;

/// Snapshot of the catalog.
#[derive(Debug, Clone, Default)]
pub struct ProductsState {
    /// Last fetched listing.
    pub products: Vec<Product>,
    /// All categories.
    pub categories: Vec<Category>,
    /// Client-side category filter.
    pub selected_category: Option<CategoryId>,
    /// Query of the last successful listing.
    pub search_query: String,
    /// A request is in flight.
    pub loading: bool,
    /// Message from the last failed action.
    pub error: Option<String>,
}

impl ProductsState {
    /// Products matching the category filter; all products when unset.
    #[must_use]
    pub fn filtered_products(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| self.selected_category.is_none_or(|id| p.category_id == id))
            .collect()
    }

    /// Number of products matching the category filter.
    #[must_use]
    pub fn products_count(&self) -> usize {
        self.filtered_products().len()
    }
}

/// Observable catalog store.
#[derive(Clone)]
pub struct ProductsStore {
    inner: Arc<ProductsStoreInner>,
}

struct ProductsStoreInner {
    api: ApiClient,
    i18n: I18n,
    state: watch::Sender<ProductsState>,
    cache: Cache<CacheKey, CacheValue>,
}

impl ProductsStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(api: ApiClient, i18n: I18n) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let (state, _) = watch::channel(ProductsState::default());
        Self {
            inner: Arc::new(ProductsStoreInner {
                api,
                i18n,
                state,
                cache,
            }),
        }
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> ProductsState {
        self.inner.state.borrow().clone()
    }

    /// Watch for state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProductsState> {
        self.inner.state.subscribe()
    }

    /// Load the product listing, optionally filtered by a search query.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self, query: &str) {
        self.start_loading();

        let result = self.inner.api.products().list(query).await;
        let fallback = self
            .inner
            .i18n
            .pick_localized("Не удалось загрузить товары", "Failed to load products");

        self.inner.state.send_modify(|s| {
            s.loading = false;
            match result {
                Ok(listing) => {
                    s.products = listing.products;
                    s.search_query = query.to_string();
                }
                Err(ref e) => s.error = Some(error_message(e, fallback)),
            }
        });
    }

    /// Load the products of one category into the listing.
    #[instrument(skip(self), fields(category_id = %category_id))]
    pub async fn fetch_products_by_category(&self, category_id: CategoryId) {
        self.start_loading();

        let result = self.inner.api.products().by_category(category_id).await;
        let fallback = self
            .inner
            .i18n
            .pick_localized("Не удалось загрузить товары", "Failed to load products");

        self.inner.state.send_modify(|s| {
            s.loading = false;
            match result {
                Ok(listing) => {
                    s.products = listing.products;
                    s.search_query.clear();
                }
                Err(ref e) => s.error = Some(error_message(e, fallback)),
            }
        });
    }

    /// Load one product.
    ///
    /// # Errors
    ///
    /// Returns the API error; the store's `error` holds its display message.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn fetch_product_by_id(&self, id: ProductId) -> Result<Product, ApiError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            self.inner.state.send_if_modified(|s| s.error.take().is_some());
            return Ok(*product);
        }

        self.start_loading();
        let result = self.inner.api.products().get(id).await;

        match result {
            Ok(product) => {
                self.inner
                    .cache
                    .insert(key, CacheValue::Product(Box::new(product.clone())))
                    .await;
                self.inner.state.send_modify(|s| s.loading = false);
                Ok(product)
            }
            Err(e) => {
                let message = error_message(
                    &e,
                    self.inner
                        .i18n
                        .pick_localized("Не удалось загрузить товар", "Failed to load product"),
                );
                self.inner.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(message);
                });
                Err(e)
            }
        }
    }

    /// Load all categories.
    ///
    /// A failure only sets the error message when no other error is shown.
    #[instrument(skip(self))]
    pub async fn fetch_categories(&self) {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            self.inner.state.send_modify(|s| s.categories = categories);
            return;
        }

        match self.inner.api.categories().list().await {
            Ok(categories) => {
                self.inner
                    .cache
                    .insert(CacheKey::Categories, CacheValue::Categories(categories.clone()))
                    .await;
                self.inner.state.send_modify(|s| s.categories = categories);
            }
            Err(e) => {
                debug!(error = %e, "Failed to load categories");
                let fallback = self
                    .inner
                    .i18n
                    .pick_localized("Не удалось загрузить категории", "Failed to load categories");
                self.inner.state.send_modify(|s| {
                    if s.error.is_none() {
                        s.error = Some(fallback.to_string());
                    }
                });
            }
        }
    }

    /// Filter the listing to one category.
    pub fn set_category(&self, category_id: Option<CategoryId>) {
        self.inner
            .state
            .send_if_modified(|s| std::mem::replace(&mut s.selected_category, category_id) != category_id);
    }

    /// Show all categories again.
    pub fn clear_category_filter(&self) {
        self.set_category(None);
    }

    /// Drop every cached product and the category list.
    pub async fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    fn start_loading(&self) {
        self.inner.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
    }
}

impl std::fmt::Debug for ProductsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("ProductsStore")
            .field("products", &state.products.len())
            .field("categories", &state.categories.len())
            .field("selected_category", &state.selected_category)
            .finish_non_exhaustive()
    }
}
