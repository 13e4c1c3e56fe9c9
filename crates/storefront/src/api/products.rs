//! Product catalog endpoints.

use bazaar_core::{CategoryId, ProductId};
use tracing::instrument;

use super::ApiClient;
use super::types::{Product, ProductList};
use crate::error::ApiError;

/// Product endpoints: `/products`.
pub struct ProductsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductsApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List products, optionally filtered by a search query.
    ///
    /// The query is trimmed; a blank query sends no `q` parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &str) -> Result<ProductList, ApiError> {
        let mut request = self.client.request(reqwest::Method::GET, "products")?;
        let query = query.trim();
        if !query.is_empty() {
            request = request.query(&[("q", query)]);
        }
        self.client.send(request).await
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get(&self, id: ProductId) -> Result<Product, ApiError> {
        self.client.get(&format!("products/{id}")).await
    }

    /// List products in one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(category_id = %category_id))]
    pub async fn by_category(&self, category_id: CategoryId) -> Result<ProductList, ApiError> {
        self.client
            .get(&format!("products/category/{category_id}"))
            .await
    }
}
