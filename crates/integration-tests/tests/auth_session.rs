//! Session lifecycle against a mock backend.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use bazaar_integration_tests::{TestContext, auth_json, user_json};
use bazaar_storefront::api::LoginRequest;
use bazaar_storefront::storage::{MemoryStorage, Storage, keys};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn signed_in_storage() -> MemoryStorage {
    MemoryStorage::with_values([
        (keys::ACCESS_TOKEN, "stored-token".to_string()),
        (
            keys::AUTH_USER,
            user_json(7, "stale@example.com", "user").to_string(),
        ),
    ])
}

#[tokio::test]
async fn test_concurrent_init_shares_one_validation() {
    let ctx = TestContext::with_storage(signed_in_storage()).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer stored-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(user_json(7, "fresh@example.com", "admin"))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    let auth = ctx.state.auth();
    let (a, b, c) = tokio::join!(
        auth.init_auth(false),
        auth.init_auth(false),
        auth.init_auth(false)
    );

    for user in [a, b, c] {
        assert_eq!(user.unwrap().email, "fresh@example.com");
    }
    assert!(auth.state().initialized);
    assert!(auth.is_admin());

    // Already initialized: no further request.
    assert!(auth.init_auth(false).await.is_some());
}

#[tokio::test]
async fn test_concurrent_failed_init_shares_one_validation() {
    let ctx = TestContext::with_storage(signed_in_storage()).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(100)))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let auth = ctx.state.auth();
    let (a, b, c) = tokio::join!(
        auth.init_auth(false),
        auth.init_auth(false),
        auth.init_auth(false)
    );

    assert!(a.is_none() && b.is_none() && c.is_none());
    assert!(auth.state().initialized);
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn test_forced_init_revalidates() {
    let ctx = TestContext::with_storage(signed_in_storage()).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(7, "a@example.com", "user")))
        .expect(2)
        .mount(&ctx.server)
        .await;

    let auth = ctx.state.auth();
    auth.init_auth(false).await;
    auth.init_auth(true).await;
}

#[tokio::test]
async fn test_init_without_token_makes_no_request() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let auth = ctx.state.auth();
    assert!(auth.init_auth(false).await.is_none());
    assert!(auth.state().initialized);
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn test_expired_session_is_wiped() {
    let ctx = TestContext::with_storage(signed_in_storage()).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})),
        )
        .mount(&ctx.server)
        .await;

    let auth = ctx.state.auth();
    assert!(auth.is_authenticated());
    assert!(auth.init_auth(false).await.is_none());

    let state = auth.state();
    assert!(state.initialized);
    assert!(state.user.is_none());
    assert!(!state.is_authenticated());
    assert!(ctx.storage.get(keys::ACCESS_TOKEN).is_none());
    assert!(ctx.storage.get(keys::AUTH_USER).is_none());
}

#[tokio::test]
async fn test_login_persists_session() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "a@example.com", "password": "hunter22"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(auth_json("new-token", user_json(1, "a@example.com", "user"))),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer new-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1, "a@example.com", "user")))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let auth = ctx.state.auth();
    let user = auth
        .login(&LoginRequest {
            email: "a@example.com".to_string(),
            password: "hunter22".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.email, "a@example.com");
    assert!(auth.is_authenticated());
    assert!(!auth.is_admin());
    assert_eq!(ctx.storage.get(keys::ACCESS_TOKEN).as_deref(), Some("new-token"));
    assert!(ctx.storage.get(keys::AUTH_USER).is_some());

    // The persisted token goes out on the next request.
    auth.fetch_me().await.unwrap();
}

#[tokio::test]
async fn test_failed_login_reports_server_detail() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"detail": "Incorrect email or password"})),
        )
        .mount(&ctx.server)
        .await;

    let auth = ctx.state.auth();
    let result = auth
        .login(&LoginRequest {
            email: "a@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await;

    assert!(result.is_err());
    assert_eq!(auth.error().as_deref(), Some("Incorrect email or password"));
    assert!(!auth.state().loading);
    assert!(!auth.is_authenticated());

    auth.clear_error();
    assert!(auth.error().is_none());
}

#[tokio::test]
async fn test_failed_google_login_uses_localized_fallback() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/google"))
        .and(body_json(json!({"id_token": "bad"})))
        .respond_with(ResponseTemplate::new(502))
        .mount(&ctx.server)
        .await;

    let auth = ctx.state.auth();
    assert!(auth.login_with_google("bad").await.is_err());
    assert_eq!(auth.error().as_deref(), Some("Не удалось войти через Google"));
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let ctx = TestContext::with_storage(signed_in_storage()).await;

    let auth = ctx.state.auth();
    auth.logout();

    let state = auth.state();
    assert!(!state.is_authenticated());
    assert!(state.user.is_none());
    assert!(state.initialized);
    assert!(ctx.storage.get(keys::ACCESS_TOKEN).is_none());
    assert!(ctx.storage.get(keys::AUTH_USER).is_none());
}
