//! Cart commands.

use bazaar_core::ProductId;
use bazaar_storefront::AppState;

use super::CommandError;

/// Show the priced cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be priced.
#[allow(clippy::print_stdout)]
pub async fn show(state: &AppState) -> Result<(), CommandError> {
    let store = state.cart();
    store.fetch_cart_details().await;

    let snapshot = store.state();
    if snapshot.error.is_some() {
        return Err(CommandError::from_store(state, snapshot.error));
    }

    let i18n = state.i18n();
    println!("{}", i18n.t("cart.title", &[]));
    if !snapshot.has_items() {
        println!("{}", i18n.t("cart.empty", &[]));
        return Ok(());
    }

    for item in &snapshot.details.items {
        println!(
            "{}",
            i18n.t(
                "cart.line",
                &[
                    ("id", item.product_id.to_string().as_str()),
                    ("name", i18n.localized_name(Some(item)).as_str()),
                    ("quantity", item.quantity.to_string().as_str()),
                    ("subtotal", i18n.format_currency(item.subtotal).as_str()),
                ],
            )
        );
    }
    println!(
        "{}",
        i18n.t_plural(
            "cart.items",
            i64::try_from(snapshot.items_count()).unwrap_or(i64::MAX),
            &[]
        )
    );
    println!(
        "{}",
        i18n.t(
            "cart.total",
            &[("total", i18n.format_currency(snapshot.total_price()).as_str())]
        )
    );
    Ok(())
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns an error if the server rejects the change.
pub async fn add(state: &AppState, id: ProductId, quantity: u32) -> Result<(), CommandError> {
    let accepted = state.cart().add_to_cart(id, quantity).await;
    report(state, accepted, "cart.added")
}

/// Set a product's quantity; zero or less removes it.
///
/// # Errors
///
/// Returns an error if the server rejects the change.
pub async fn update(state: &AppState, id: ProductId, quantity: i64) -> Result<(), CommandError> {
    let accepted = state.cart().update_quantity(id, quantity).await;
    let key = if quantity > 0 {
        "cart.updated"
    } else {
        "cart.removed"
    };
    report(state, accepted, key)
}

/// Remove a product from the cart.
///
/// # Errors
///
/// Returns an error if the server rejects the change.
pub async fn remove(state: &AppState, id: ProductId) -> Result<(), CommandError> {
    let accepted = state.cart().remove_from_cart(id).await;
    report(state, accepted, "cart.removed")
}

/// Empty the cart.
#[allow(clippy::print_stdout)]
pub fn clear(state: &AppState) {
    state.cart().clear_cart();
    println!("{}", state.i18n().t("cart.cleared", &[]));
}

#[allow(clippy::print_stdout)]
fn report(state: &AppState, accepted: bool, message_key: &str) -> Result<(), CommandError> {
    if !accepted {
        return Err(CommandError::from_store(state, state.cart().state().error));
    }

    let i18n = state.i18n();
    println!("{}", i18n.t(message_key, &[]));
    println!(
        "{}",
        i18n.t_plural(
            "cart.items",
            i64::try_from(state.cart().state().items_count()).unwrap_or(i64::MAX),
            &[]
        )
    );
    Ok(())
}
