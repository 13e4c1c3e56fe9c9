//! Admin panel endpoints.
//!
//! Pure request shaping: payloads are built as given and every check
//! (permissions, field constraints, image limits) happens on the server.

use bazaar_core::{CategoryId, ProductId, UserId, UserRole};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::instrument;

use super::ApiClient;
use super::types::{
    Category, CategoryPayload, MessageResponse, Product, ProductForm, ProductList,
    RoleUpdateRequest, User,
};
use crate::error::ApiError;

/// Admin endpoints: `/admin`.
pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// List all accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not an admin or the request fails.
    #[instrument(skip(self))]
    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.client.get("admin/users").await
    }

    /// Change an account's role.
    ///
    /// # Errors
    ///
    /// Returns an error if the server refuses the change or the request fails.
    #[instrument(skip(self), fields(user_id = %user_id, role = %role))]
    pub async fn update_user_role(&self, user_id: UserId, role: UserRole) -> Result<User, ApiError> {
        self.client
            .send_json(
                Method::PATCH,
                &format!("admin/users/{user_id}/role"),
                &RoleUpdateRequest { role },
            )
            .await
    }

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the server refuses the deletion or the request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn delete_user(&self, user_id: UserId) -> Result<MessageResponse, ApiError> {
        self.delete(&format!("admin/users/{user_id}")).await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.client.get("admin/categories").await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the payload or the request fails.
    #[instrument(skip(self, payload), fields(slug = %payload.slug))]
    pub async fn create_category(&self, payload: &CategoryPayload) -> Result<Category, ApiError> {
        self.client
            .send_json(Method::POST, "admin/categories", payload)
            .await
    }

    /// Replace a category's name and slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the payload or the request fails.
    #[instrument(skip(self, payload), fields(category_id = %id, slug = %payload.slug))]
    pub async fn update_category(
        &self,
        id: CategoryId,
        payload: &CategoryPayload,
    ) -> Result<Category, ApiError> {
        self.client
            .send_json(Method::PUT, &format!("admin/categories/{id}"), payload)
            .await
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the server refuses the deletion or the request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<MessageResponse, ApiError> {
        self.delete(&format!("admin/categories/{id}")).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<ProductList, ApiError> {
        self.client.get("admin/products").await
    }

    /// Create a product from a multipart form.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the form or the request fails.
    #[instrument(skip(self, form), fields(name = %form.name, images = form.images.len()))]
    pub async fn create_product(&self, form: &ProductForm) -> Result<Product, ApiError> {
        let request = self
            .client
            .request(Method::POST, "admin/products")?
            .multipart(build_product_form(form)?);
        self.client.send(request).await
    }

    /// Replace a product from a multipart form.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the form or the request fails.
    #[instrument(skip(self, form), fields(product_id = %id, images = form.images.len()))]
    pub async fn update_product(&self, id: ProductId, form: &ProductForm) -> Result<Product, ApiError> {
        let request = self
            .client
            .request(Method::PUT, &format!("admin/products/{id}"))?
            .multipart(build_product_form(form)?);
        self.client.send(request).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the server refuses the deletion or the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<MessageResponse, ApiError> {
        self.delete(&format!("admin/products/{id}")).await
    }

    async fn delete(&self, path: &str) -> Result<MessageResponse, ApiError> {
        self.client
            .send(self.client.request(Method::DELETE, path)?)
            .await
    }
}

/// Encode a product form as `multipart/form-data`.
fn build_product_form(form: &ProductForm) -> Result<Form, ApiError> {
    let mut multipart = Form::new()
        .text("name", form.name.clone())
        .text("price", form.price.to_string())
        .text("category_id", form.category_id.to_string());

    if let Some(description) = &form.description {
        multipart = multipart.text("description", description.clone());
    }

    if let Some(existing) = &form.existing_image_urls {
        multipart = multipart.text("existing_image_urls", serde_json::to_string(existing)?);
    }

    for image in &form.images {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)?;
        multipart = multipart.part("image_files", part);
    }

    Ok(multipart)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::api::types::ImageUpload;

    fn form() -> ProductForm {
        ProductForm {
            name: "Green tea".to_string(),
            price: Decimal::new(25000, 2),
            category_id: CategoryId::new(2),
            description: None,
            images: vec![ImageUpload {
                file_name: "tea.jpg".to_string(),
                mime_type: "image/jpeg".to_string(),
                bytes: vec![0xFF, 0xD8, 0xFF],
            }],
            existing_image_urls: Some(vec!["/static/images/a.jpg".to_string()]),
        }
    }

    #[test]
    fn test_build_product_form_accepts_valid_mime() {
        let multipart = build_product_form(&form()).unwrap();
        assert!(!multipart.boundary().is_empty());
    }

    #[test]
    fn test_build_product_form_rejects_invalid_mime() {
        let mut form = form();
        form.images[0].mime_type = "not a mime".to_string();
        assert!(matches!(build_product_form(&form), Err(ApiError::Http(_))));
    }
}
