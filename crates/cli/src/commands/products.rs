//! Catalog browsing commands.

use bazaar_core::{CategoryId, ProductId};
use bazaar_storefront::AppState;

use super::CommandError;

/// List products, optionally searched or limited to a category.
///
/// # Errors
///
/// Returns an error if the listing cannot be loaded.
#[allow(clippy::print_stdout)]
pub async fn list(
    state: &AppState,
    query: Option<&str>,
    category: Option<CategoryId>,
) -> Result<(), CommandError> {
    let store = state.products();
    if let Some(category_id) = category {
        store.fetch_products_by_category(category_id).await;
        store.set_category(Some(category_id));
    } else {
        store.fetch_products(query.unwrap_or_default()).await;
        store.clear_category_filter();
    }

    let snapshot = store.state();
    if snapshot.error.is_some() {
        return Err(CommandError::from_store(state, snapshot.error));
    }

    let i18n = state.i18n();
    println!("{}", i18n.t("products.title", &[]));

    let products = snapshot.filtered_products();
    if products.is_empty() {
        println!("{}", i18n.t("products.empty", &[]));
        return Ok(());
    }

    for product in products.iter().copied() {
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
            i64::try_from(snapshot.products_count()).unwrap_or(i64::MAX),
            &[]
        )
    );
    Ok(())
}

/// Show one product in detail.
///
/// # Errors
///
/// Returns an error if the product cannot be loaded.
#[allow(clippy::print_stdout)]
pub async fn show(state: &AppState, id: ProductId) -> Result<(), CommandError> {
    let product = state
        .products()
        .fetch_product_by_id(id)
        .await
        .map_err(|_| CommandError::from_store(state, state.products().state().error))?;

    let i18n = state.i18n();
    println!("{}", i18n.localized_product_name(Some(&product)));
    println!(
        "{}",
        i18n.t("products.price", &[("price", i18n.format_currency(product.price).as_str())])
    );
    if let Some(category) = &product.category {
        println!(
            "{}",
            i18n.t(
                "products.category",
                &[("category", i18n.localized_category_name(Some(category)).as_str())]
            )
        );
    }
    if let Some(created_at) = &product.created_at {
        println!(
            "{}",
            i18n.t("products.added_on", &[("date", i18n.format_date(created_at).as_str())])
        );
    }

    let description = i18n.localized_product_description(Some(&product));
    if description.is_empty() {
        println!("{}", i18n.t("products.no_description", &[]));
    } else {
        println!("\n{description}\n");
    }

    let images = state.media().product_images(&product);
    if !images.is_empty() {
        println!("{}", i18n.t("products.images", &[]));
        for url in images {
            println!("  {url}");
        }
    }
    Ok(())
}

/// List categories.
///
/// # Errors
///
/// Returns an error if the categories cannot be loaded.
#[allow(clippy::print_stdout)]
pub async fn categories(state: &AppState) -> Result<(), CommandError> {
    let store = state.products();
    store.fetch_categories().await;

    let snapshot = store.state();
    if snapshot.error.is_some() {
        return Err(CommandError::from_store(state, snapshot.error));
    }

    let i18n = state.i18n();
    println!("{}", i18n.t("categories.title", &[]));
    if snapshot.categories.is_empty() {
        println!("{}", i18n.t("categories.empty", &[]));
    }
    for category in &snapshot.categories {
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
