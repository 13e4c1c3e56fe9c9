//! Cart endpoints.
//!
//! The server keeps no cart state: every call carries the client's complete
//! line map and the server answers with the validated map (mutations) or the
//! priced view (details).

use bazaar_core::{CartLines, ProductId};
use reqwest::Method;
use tracing::instrument;

use super::ApiClient;
use super::types::{CartBody, CartDetails, CartItemRequest, CartMutation};
use crate::error::ApiError;

/// Cart endpoints: `/cart`.
pub struct CartApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CartApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Add `quantity` of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the item or the request fails.
    #[instrument(skip(self, cart), fields(product_id = %product_id, lines = cart.len()))]
    pub async fn add_item(
        &self,
        product_id: ProductId,
        quantity: u32,
        cart: &CartLines,
    ) -> Result<CartMutation, ApiError> {
        let body = CartItemRequest {
            product_id,
            quantity,
            cart,
        };
        self.client.send_json(Method::POST, "cart/add", &body).await
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the item or the request fails.
    #[instrument(skip(self, cart), fields(product_id = %product_id, lines = cart.len()))]
    pub async fn update_item(
        &self,
        product_id: ProductId,
        quantity: u32,
        cart: &CartLines,
    ) -> Result<CartMutation, ApiError> {
        let body = CartItemRequest {
            product_id,
            quantity,
            cart,
        };
        self.client.send_json(Method::PUT, "cart/update", &body).await
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, cart), fields(product_id = %product_id, lines = cart.len()))]
    pub async fn remove_item(
        &self,
        product_id: ProductId,
        cart: &CartLines,
    ) -> Result<CartMutation, ApiError> {
        self.client
            .send_json(
                Method::DELETE,
                &format!("cart/remove/{product_id}"),
                &CartBody { cart },
            )
            .await
    }

    /// Price the given line map.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, cart), fields(lines = cart.len()))]
    pub async fn details(&self, cart: &CartLines) -> Result<CartDetails, ApiError> {
        self.client.send_json(Method::POST, "cart", cart).await
    }
}
