//! Admin panel commands.
//!
//! Each command calls the admin API directly. Role checks happen on the
//! server; a non-admin caller sees the server's refusal message.

use std::path::{Path, PathBuf};

use bazaar_core::{CategoryId, ProductId, UserId, UserRole};
use bazaar_storefront::AppState;
use bazaar_storefront::api::{
    CategoryPayload, ImageUpload, MessageResponse, Product, ProductForm, User,
};
use rust_decimal::Decimal;

use super::CommandError;

/// Product fields as entered on the command line.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub price: Decimal,
    pub category_id: CategoryId,
    pub description: Option<String>,
    pub images: Vec<PathBuf>,
}

/// Read image files and assemble a multipart product form.
///
/// `keep_images` lists already uploaded image URLs to retain on update;
/// `None` leaves the field out of the form.
///
/// # Errors
///
/// Returns an error if an image file cannot be read.
pub fn product_form(
    input: ProductInput,
    keep_images: Option<Vec<String>>,
) -> Result<ProductForm, CommandError> {
    let images = input
        .images
        .iter()
        .map(|path| read_image(path))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ProductForm {
        name: input.name,
        price: input.price,
        category_id: input.category_id,
        description: input.description,
        images,
        existing_image_urls: keep_images,
    })
}

fn read_image(path: &Path) -> Result<ImageUpload, CommandError> {
    let bytes = std::fs::read(path).map_err(|source| CommandError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());

    Ok(ImageUpload {
        mime_type: mime_for(path).to_string(),
        file_name,
        bytes,
    })
}

fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// Users
// =============================================================================

/// List all accounts.
///
/// # Errors
///
/// Returns an error if the request is refused or fails.
#[allow(clippy::print_stdout)]
pub async fn users(state: &AppState) -> Result<(), CommandError> {
    let users = state
        .api()
        .admin()
        .users()
        .await
        .map_err(|e| CommandError::from_api(state, &e))?;

    let i18n = state.i18n();
    for user in &users {
        println!("{}", user_line(state, user));
    }
    println!(
        "{}",
        i18n.t_plural(
            "admin.users",
            i64::try_from(users.len()).unwrap_or(i64::MAX),
            &[]
        )
    );
    Ok(())
}

/// Change an account's role.
///
/// # Errors
///
/// Returns an error if the request is refused or fails.
#[allow(clippy::print_stdout)]
pub async fn set_role(state: &AppState, id: UserId, role: UserRole) -> Result<(), CommandError> {
    let user = state
        .api()
        .admin()
        .update_user_role(id, role)
        .await
        .map_err(|e| CommandError::from_api(state, &e))?;
    println!(
        "{}",
        state.i18n().t(
            "admin.role_updated",
            &[("email", user.email.as_str()), ("role", user.role.as_str())]
        )
    );
    Ok(())
}

/// Delete an account.
///
/// # Errors
///
/// Returns an error if the request is refused or fails.
pub async fn delete_user(state: &AppState, id: UserId) -> Result<(), CommandError> {
    let response = state.api().admin().delete_user(id).await;
    report_deleted(state, response)
}

fn user_line(state: &AppState, user: &User) -> String {
    state.i18n().t(
        "admin.user_line",
        &[
            ("id", user.id.to_string().as_str()),
            ("name", user.full_name.as_str()),
            ("email", user.email.as_str()),
            ("role", user.role.as_str()),
            ("provider", user.provider.as_str()),
        ],
    )
}

// =============================================================================
// Categories
// =============================================================================

/// List all categories.
///
/// # Errors
///
/// Returns an error if the request is refused or fails.
#[allow(clippy::print_stdout)]
pub async fn categories(state: &AppState) -> Result<(), CommandError> {
    let categories = state
        .api()
        .admin()
        .categories()
        .await
        .map_err(|e| CommandError::from_api(state, &e))?;

    let i18n = state.i18n();
    if categories.is_empty() {
        println!("{}", i18n.t("categories.empty", &[]));
    }
    for category in &categories {
        println!(
            "{}",
            i18n.t(
                "categories.line",
                &[
                    ("id", category.id.to_string().as_str()),
                    ("name", i18n.localized_category_name(Some(category)).as_str()),
                    ("slug", category.slug.as_str()),
                ],
            )
        );
    }
    Ok(())
}

/// Create a category.
///
/// # Errors
///
/// Returns an error if the request is refused or fails.
#[allow(clippy::print_stdout)]
pub async fn create_category(
    state: &AppState,
    name: String,
    slug: String,
) -> Result<(), CommandError> {
    let category = state
        .api()
        .admin()
        .create_category(&CategoryPayload { name, slug })
        .await
        .map_err(|e| CommandError::from_api(state, &e))?;
    println!(
        "{}",
        state
            .i18n()
            .t("admin.category_saved", &[("id", category.id.to_string().as_str())])
    );
    Ok(())
}

/// Update a category.
///
/// # Errors
///
/// Returns an error if the request is refused or fails.
#[allow(clippy::print_stdout)]
pub async fn update_category(
    state: &AppState,
    id: CategoryId,
    name: String,
    slug: String,
) -> Result<(), CommandError> {
    let category = state
        .api()
        .admin()
        .update_category(id, &CategoryPayload { name, slug })
        .await
        .map_err(|e| CommandError::from_api(state, &e))?;
    println!(
        "{}",
        state
            .i18n()
            .t("admin.category_saved", &[("id", category.id.to_string().as_str())])
    );
    Ok(())
}

/// Delete a category.
///
/// # Errors
///
/// Returns an error if the request is refused or fails.
pub async fn delete_category(state: &AppState, id: CategoryId) -> Result<(), CommandError> {
    let response = state.api().admin().delete_category(id).await;
    report_deleted(state, response)
}

// =============================================================================
// Products
// =============================================================================

/// List all products, including those hidden from the storefront.
///
/// # Errors
///
/// Returns an error if the request is refused or fails.
#[allow(clippy::print_stdout)]
pub async fn products(state: &AppState) -> Result<(), CommandError> {
    let listing = state
        .api()
        .admin()
        .products()
        .await
        .map_err(|e| CommandError::from_api(state, &e))?;

    let i18n = state.i18n();
    if listing.products.is_empty() {
        println!("{}", i18n.t("products.empty", &[]));
    }
    for product in &listing.products {
        println!(
            "{}",
            i18n.t(
                "products.line",
                &[
                    ("id", product.id.to_string().as_str()),
                    ("name", i18n.localized_product_name(Some(product)).as_str()),
                    ("price", i18n.format_currency(product.price).as_str()),
                ],
            )
        );
    }
    println!(
        "{}",
        i18n.t_plural(
            "products.count",
            i64::try_from(listing.total).unwrap_or(i64::MAX),
            &[]
        )
    );
    Ok(())
}

/// Create a product.
///
/// # Errors
///
/// Returns an error if the request is refused or fails.
pub async fn create_product(state: &AppState, form: &ProductForm) -> Result<(), CommandError> {
    let product = state
        .api()
        .admin()
        .create_product(form)
        .await
        .map_err(|e| CommandError::from_api(state, &e))?;
    report_product_saved(state, &product);
    Ok(())
}

/// Replace a product.
///
/// # Errors
///
/// Returns an error if the request is refused or fails.
pub async fn update_product(
    state: &AppState,
    id: ProductId,
    form: &ProductForm,
) -> Result<(), CommandError> {
    let product = state
        .api()
        .admin()
        .update_product(id, form)
        .await
        .map_err(|e| CommandError::from_api(state, &e))?;
    state.products().invalidate_cache().await;
    report_product_saved(state, &product);
    Ok(())
}

/// Delete a product.
///
/// # Errors
///
/// Returns an error if the request is refused or fails.
pub async fn delete_product(state: &AppState, id: ProductId) -> Result<(), CommandError> {
    let response = state.api().admin().delete_product(id).await;
    state.products().invalidate_cache().await;
    report_deleted(state, response)
}

#[allow(clippy::print_stdout)]
fn report_product_saved(state: &AppState, product: &Product) {
    println!(
        "{}",
        state
            .i18n()
            .t("admin.product_saved", &[("id", product.id.to_string().as_str())])
    );
    for url in state.media().product_images(product) {
        println!("  {url}");
    }
}

#[allow(clippy::print_stdout)]
fn report_deleted(
    state: &AppState,
    response: Result<MessageResponse, bazaar_storefront::error::ApiError>,
) -> Result<(), CommandError> {
    let response = response.map_err(|e| CommandError::from_api(state, &e))?;
    println!(
        "{}",
        state
            .i18n()
            .t("admin.deleted", &[("message", response.message.as_str())])
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_known_extensions() {
        assert_eq!(mime_for(Path::new("a/photo.JPG")), "image/jpeg");
        assert_eq!(mime_for(Path::new("shot.webp")), "image/webp");
        assert_eq!(mime_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_product_form_reports_missing_file() {
        let input = ProductInput {
            name: "Tea".to_string(),
            price: Decimal::new(1500, 2),
            category_id: CategoryId::new(1),
            description: None,
            images: vec![PathBuf::from("/definitely/not/here.png")],
        };

        let err = product_form(input, None).unwrap_err();
        assert!(matches!(err, CommandError::ReadFile { .. }));
    }

    #[test]
    fn test_product_form_keeps_existing_urls() {
        let input = ProductInput {
            name: "Tea".to_string(),
            price: Decimal::new(1500, 2),
            category_id: CategoryId::new(1),
            description: Some("Green".to_string()),
            images: Vec::new(),
        };

        let form = product_form(input, Some(vec!["/uploads/a.png".to_string()])).unwrap();
        assert_eq!(form.existing_image_urls.as_deref(), Some(&["/uploads/a.png".to_string()][..]));
        assert!(form.images.is_empty());
    }
}
