//! Category endpoints.

use bazaar_core::CategoryId;
use tracing::instrument;

use super::ApiClient;
use super::types::Category;
use crate::error::ApiError;

/// Category endpoints: `/categories`.
pub struct CategoriesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CategoriesApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        self.client.get("categories").await
    }

    /// Get a single category.
    ///
    /// # Errors
    ///
    /// Returns an error if the category does not exist or the request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn get(&self, id: CategoryId) -> Result<Category, ApiError> {
        self.client.get(&format!("categories/{id}")).await
    }
}
