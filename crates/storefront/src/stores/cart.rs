//! Shopping cart store.
//!
//! # Reconciliation
//!
//! The local line map is the only cart state kept between runs. Each mutation
//! sends the whole map plus the changed line; the server answers with the map
//! it accepted (it may drop unknown or unavailable products). That answer
//! replaces the local map, is persisted, and the priced view is refetched.
//! On failure the local map is left as it was.

use std::sync::Arc;

use bazaar_core::{CartLines, ProductId};
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{instrument, warn};

use crate::api::{ApiClient, CartDetails, CartMutation};
use crate::error::{ApiError, error_message};
use crate::i18n::I18n;
use crate::storage::{self, Storage, keys};

/// Snapshot of the cart.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    /// Product id to quantity.
    pub items: CartLines,
    /// Priced view from the server.
    pub details: CartDetails,
    /// The priced view is being fetched.
    pub loading: bool,
    /// Message from the last failed action.
    pub error: Option<String>,
}

impl CartState {
    /// Sum of local quantities.
    #[must_use]
    pub fn items_count(&self) -> u64 {
        self.items.total_quantity()
    }

    /// Total as priced by the server.
    #[must_use]
    pub const fn total_price(&self) -> Decimal {
        self.details.total
    }

    /// Whether the cart has any line.
    #[must_use]
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Observable cart store.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    api: ApiClient,
    storage: Arc<dyn Storage>,
    i18n: I18n,
    state: watch::Sender<CartState>,
}

impl CartStore {
    /// Create an empty store. Call [`Self::init_cart`] to load the saved cart.
    #[must_use]
    pub fn new(api: ApiClient, storage: Arc<dyn Storage>, i18n: I18n) -> Self {
        let (state, _) = watch::channel(CartState::default());
        Self {
            inner: Arc::new(CartStoreInner {
                api,
                storage,
                i18n,
                state,
            }),
        }
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> CartState {
        self.inner.state.borrow().clone()
    }

    /// Watch for state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.inner.state.subscribe()
    }

    /// Current line map.
    #[must_use]
    pub fn items(&self) -> CartLines {
        self.inner.state.borrow().items.clone()
    }

    /// Load the saved line map. Invalid entries are dropped; an unreadable
    /// value is discarded and removed from storage.
    pub fn init_cart(&self) {
        let Some(saved) = self.inner.storage.get(keys::SHOPPING_CART) else {
            return;
        };

        let items = match serde_json::from_str::<Value>(&saved) {
            Ok(raw) => CartLines::normalize(&raw),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable saved cart");
                storage::forget(self.inner.storage.as_ref(), keys::SHOPPING_CART);
                CartLines::new()
            }
        };
        self.inner.state.send_modify(|s| s.items = items);
    }

    /// Add `quantity` of a product. Returns whether the server accepted it.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(&self, product_id: ProductId, quantity: u32) -> bool {
        self.clear_error();
        let items = self.items();
        let result = self
            .inner
            .api
            .cart()
            .add_item(product_id, quantity, &items)
            .await;
        self.reconcile(
            result,
            ("Не удалось добавить товар в корзину", "Failed to add product to cart"),
        )
        .await
    }

    /// Set a line's quantity. Zero or less removes the line.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_quantity(&self, product_id: ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_from_cart(product_id).await;
        }

        self.clear_error();
        let items = self.items();
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let result = self
            .inner
            .api
            .cart()
            .update_item(product_id, quantity, &items)
            .await;
        self.reconcile(result, ("Не удалось обновить корзину", "Failed to update cart"))
            .await
    }

    /// Remove a line.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_from_cart(&self, product_id: ProductId) -> bool {
        self.clear_error();
        let items = self.items();
        let result = self.inner.api.cart().remove_item(product_id, &items).await;
        self.reconcile(
            result,
            (
                "Не удалось удалить товар из корзины",
                "Failed to remove product from cart",
            ),
        )
        .await
    }

    /// Refresh the priced view. An empty cart resets it without a request.
    #[instrument(skip(self))]
    pub async fn fetch_cart_details(&self) {
        let items = self.items();
        if items.is_empty() {
            self.inner
                .state
                .send_modify(|s| s.details = CartDetails::default());
            return;
        }

        self.inner.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = self.inner.api.cart().details(&items).await;
        let fallback = self
            .inner
            .i18n
            .pick_localized("Не удалось загрузить корзину", "Failed to load cart");

        self.inner.state.send_modify(|s| {
            s.loading = false;
            match result {
                Ok(details) => s.details = details,
                Err(ref e) => s.error = Some(error_message(e, fallback)),
            }
        });
    }

    /// Empty the cart locally and in storage.
    pub fn clear_cart(&self) {
        self.inner.state.send_modify(|s| {
            s.items = CartLines::new();
            s.details = CartDetails::default();
            s.error = None;
        });
        storage::forget(self.inner.storage.as_ref(), keys::SHOPPING_CART);
    }

    async fn reconcile(
        &self,
        result: Result<CartMutation, ApiError>,
        (ru, en): (&str, &str),
    ) -> bool {
        match result {
            Ok(mutation) => {
                self.save(mutation.cart);
                self.fetch_cart_details().await;
                true
            }
            Err(e) => {
                let message = error_message(&e, self.inner.i18n.pick_localized(ru, en));
                self.inner.state.send_modify(|s| s.error = Some(message));
                false
            }
        }
    }

    fn save(&self, items: CartLines) {
        match serde_json::to_string(&items) {
            Ok(json) => storage::persist(self.inner.storage.as_ref(), keys::SHOPPING_CART, &json),
            Err(e) => warn!(error = %e, "Failed to encode cart"),
        }
        self.inner.state.send_modify(|s| s.items = items);
    }

    fn clear_error(&self) {
        self.inner.state.send_if_modified(|s| s.error.take().is_some());
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.inner.state.borrow().items)
            .finish_non_exhaustive()
    }
}
