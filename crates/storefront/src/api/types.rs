//! Request and response types for the storefront API.
//!
//! Records mirror what the server sends. Optional and defaulted fields are
//! lenient so older or partial payloads still decode.

use bazaar_core::{CartLines, CategoryId, ProductId, UserId, UserRole};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog Types
// =============================================================================

/// Product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Generic (fallback) name.
    pub name: String,
    /// Russian name.
    #[serde(default)]
    pub name_ru: Option<String>,
    /// English name.
    #[serde(default)]
    pub name_en: Option<String>,
    /// URL-friendly identifier.
    #[serde(default)]
    pub slug: String,
}

/// Catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Generic (fallback) name.
    pub name: String,
    /// Russian name.
    #[serde(default)]
    pub name_ru: Option<String>,
    /// English name.
    #[serde(default)]
    pub name_en: Option<String>,
    /// Generic (fallback) description.
    #[serde(default)]
    pub description: Option<String>,
    /// Russian description.
    #[serde(default)]
    pub description_ru: Option<String>,
    /// English description.
    #[serde(default)]
    pub description_en: Option<String>,
    /// Unit price in KGS.
    pub price: Decimal,
    /// Owning category.
    pub category_id: CategoryId,
    /// Primary image URL (legacy single-image field).
    #[serde(default)]
    pub image_url: Option<String>,
    /// All image URLs, primary first.
    #[serde(default)]
    pub images: Vec<String>,
    /// Creation timestamp as sent by the server.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Embedded category record.
    #[serde(default)]
    pub category: Option<Category>,
}

/// Product listing response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductList {
    /// Products on this listing.
    pub products: Vec<Product>,
    /// Total number of matching products.
    #[serde(default)]
    pub total: u64,
}

// =============================================================================
// Cart Types
// =============================================================================

/// One priced line of the server-side cart view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product ID.
    pub product_id: ProductId,
    /// Generic (fallback) product name.
    #[serde(default)]
    pub name: String,
    /// Russian product name.
    #[serde(default)]
    pub name_ru: Option<String>,
    /// English product name.
    #[serde(default)]
    pub name_en: Option<String>,
    /// Unit price.
    #[serde(default)]
    pub price: Decimal,
    /// Quantity accepted by the server.
    pub quantity: u32,
    /// `price * quantity`.
    #[serde(default)]
    pub subtotal: Decimal,
    /// Product image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Server-derived cart view: priced lines and totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartDetails {
    /// Priced lines.
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Total price of all lines.
    #[serde(default)]
    pub total: Decimal,
    /// Number of items as counted by the server.
    #[serde(default)]
    pub items_count: u64,
}

/// Response to a cart mutation: the server-validated line map.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartMutation {
    /// Line map after the server applied the change.
    #[serde(default)]
    pub cart: CartLines,
}

/// Body of add/update cart calls.
#[derive(Debug, Serialize)]
pub(crate) struct CartItemRequest<'a> {
    pub product_id: ProductId,
    pub quantity: u32,
    pub cart: &'a CartLines,
}

/// Body of the remove cart call.
#[derive(Debug, Serialize)]
pub(crate) struct CartBody<'a> {
    pub cart: &'a CartLines,
}

// =============================================================================
// Auth Types
// =============================================================================

/// Account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Identity provider (`local`, `google`).
    #[serde(default)]
    pub provider: String,
    /// Account role.
    #[serde(default)]
    pub role: UserRole,
    /// Creation timestamp as sent by the server.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    /// Whether the account may use the admin panel.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Successful login/register response.
#[derive(Clone, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Token type, always `bearer`.
    #[serde(default)]
    pub token_type: String,
    /// Authenticated account.
    pub user: User,
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("user", &self.user)
            .finish()
    }
}

/// Email/password login payload.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Registration payload.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    /// Account email.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Chosen password.
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Google sign-in payload.
#[derive(Debug, Serialize)]
pub(crate) struct GoogleLoginRequest<'a> {
    pub id_token: &'a str,
}

// =============================================================================
// Admin Types
// =============================================================================

/// Role change payload.
#[derive(Debug, Serialize)]
pub(crate) struct RoleUpdateRequest {
    pub role: UserRole,
}

/// Category create/update payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPayload {
    /// Category name.
    pub name: String,
    /// URL-friendly identifier.
    pub slug: String,
}

/// Image file attached to a product form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name.
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`.
    pub mime_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Product create/update form, sent as `multipart/form-data`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    /// Product name.
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    /// Owning category.
    pub category_id: CategoryId,
    /// Description.
    pub description: Option<String>,
    /// New images to upload.
    pub images: Vec<ImageUpload>,
    /// On update: existing image URLs to keep, in order. `None` keeps all.
    pub existing_image_urls: Option<Vec<String>>,
}

/// Plain acknowledgement response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}
