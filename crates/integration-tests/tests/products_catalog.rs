//! Product listing, filtering and the detail cache.

#![allow(clippy::unwrap_used)]

use bazaar_core::{CategoryId, ProductId};
use bazaar_integration_tests::{TestContext, category_json, product_json};
use bazaar_storefront::storage::{MemoryStorage, keys};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_search_lists_products() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(query_param("q", "tea"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [
                product_json(1, "Green tea", "250.00", 10),
                product_json(2, "Black tea", "300.00", 11)
            ],
            "total": 2
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let store = ctx.state.products();
    store.fetch_products("tea").await;

    let state = store.state();
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(state.search_query, "tea");
    assert_eq!(state.products_count(), 2);

    store.set_category(Some(CategoryId::new(11)));
    let state = store.state();
    let filtered = state.filtered_products();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered.first().unwrap().id, ProductId::new(2));

    store.clear_category_filter();
    assert_eq!(store.state().filtered_products().len(), 2);
}

#[tokio::test]
async fn test_category_listing_clears_search() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"products": [], "total": 0})))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products/category/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [product_json(1, "Green tea", "250.00", 10)],
            "total": 1
        })))
        .mount(&ctx.server)
        .await;

    let store = ctx.state.products();
    store.fetch_products("coffee").await;
    store.fetch_products_by_category(CategoryId::new(10)).await;

    let state = store.state();
    assert!(state.search_query.is_empty());
    assert_eq!(state.products_count(), 1);
}

#[tokio::test]
async fn test_listing_failure_sets_localized_error() {
    let ctx =
        TestContext::with_storage(MemoryStorage::with_values([(keys::LOCALE, "en")])).await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&ctx.server)
        .await;

    let store = ctx.state.products();
    store.fetch_products("").await;

    let state = store.state();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Failed to load products"));
}

#[tokio::test]
async fn test_product_detail_is_cached() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/api/products/5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(product_json(5, "Oolong", "420.50", 10)),
        )
        .expect(2)
        .mount(&ctx.server)
        .await;

    let store = ctx.state.products();
    let first = store.fetch_product_by_id(ProductId::new(5)).await.unwrap();
    let second = store.fetch_product_by_id(ProductId::new(5)).await.unwrap();
    assert_eq!(first, second);

    store.invalidate_cache().await;
    store.fetch_product_by_id(ProductId::new(5)).await.unwrap();
}

#[tokio::test]
async fn test_cached_detail_clears_stale_error() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/api/products/5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(product_json(5, "Oolong", "420.50", 10)),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&ctx.server)
        .await;

    let store = ctx.state.products();
    store.fetch_product_by_id(ProductId::new(5)).await.unwrap();
    store.fetch_products("").await;
    assert!(store.state().error.is_some());

    store.fetch_product_by_id(ProductId::new(5)).await.unwrap();
    assert!(store.state().error.is_none());
}

#[tokio::test]
async fn test_missing_product_reports_server_detail() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/api/products/404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Product not found"})),
        )
        .mount(&ctx.server)
        .await;

    let store = ctx.state.products();
    assert!(store.fetch_product_by_id(ProductId::new(404)).await.is_err());
    assert_eq!(store.state().error.as_deref(), Some("Product not found"));
}

#[tokio::test]
async fn test_categories_are_cached() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            category_json(10, "Green", "green"),
            category_json(11, "Black", "black")
        ])))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let store = ctx.state.products();
    store.fetch_categories().await;
    store.fetch_categories().await;

    assert_eq!(store.state().categories.len(), 2);
}

#[tokio::test]
async fn test_category_failure_keeps_existing_error() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "Bad query"})))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.server)
        .await;

    let store = ctx.state.products();
    store.fetch_products("??").await;
    store.fetch_categories().await;

    assert_eq!(store.state().error.as_deref(), Some("Bad query"));
}

#[tokio::test]
async fn test_localized_names_follow_locale() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/api/products/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(product_json(1, "Green tea", "250.00", 10)),
        )
        .mount(&ctx.server)
        .await;

    let product = ctx
        .state
        .products()
        .fetch_product_by_id(ProductId::new(1))
        .await
        .unwrap();
    let i18n = ctx.state.i18n();

    assert_eq!(i18n.localized_product_name(Some(&product)), "Green tea (ru)");
    assert_eq!(i18n.format_currency(product.price), "250,00\u{a0}сом");

    ctx.state.locale().set_locale("en");
    assert_eq!(i18n.localized_product_name(Some(&product)), "Green tea");
    assert_eq!(i18n.format_currency(product.price), "KGS\u{a0}250.00");
    assert_eq!(
        ctx.state.media().primary_product_image(&product),
        format!("{}/uploads/1.png", ctx.server.uri())
    );
}
