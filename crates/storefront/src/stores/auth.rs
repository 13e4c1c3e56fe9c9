//! Authentication session store.
//!
//! # Lifecycle
//!
//! The store starts uninitialized with whatever token and user record were
//! persisted. [`AuthStore::init_auth`] validates the token against
//! `GET /auth/me` once; concurrent callers share that single request. Login,
//! registration and Google sign-in replace the session wholesale. Logout and
//! any `401` response (detected by the API client) clear it.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiClient, AuthResponse, LoginRequest, RegisterRequest, User};
use crate::error::{ApiError, error_message};
use crate::i18n::I18n;
use crate::storage::{self, Storage, keys};

type InitFuture = Shared<BoxFuture<'static, Option<User>>>;

/// Snapshot of the session.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    /// Bearer token of the current session.
    pub token: Option<SecretString>,
    /// Signed-in account.
    pub user: Option<User>,
    /// A login/register request is in flight.
    pub loading: bool,
    /// Message from the last failed action.
    pub error: Option<String>,
    /// The stored session has been validated (or found absent).
    pub initialized: bool,
}

impl AuthState {
    /// A token and a user record are both present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// The signed-in account is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }
}

/// Observable session store.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<AuthStoreInner>,
}

struct AuthStoreInner {
    api: ApiClient,
    storage: Arc<dyn Storage>,
    i18n: I18n,
    state: watch::Sender<AuthState>,
    init: Mutex<Option<InitFuture>>,
}

impl AuthStore {
    /// Create the store from the persisted session.
    ///
    /// A stored user record that cannot be parsed is treated as absent.
    #[must_use]
    pub fn new(api: ApiClient, storage: Arc<dyn Storage>, i18n: I18n) -> Self {
        let token = storage
            .get(keys::ACCESS_TOKEN)
            .filter(|t| !t.is_empty())
            .map(SecretString::from);
        let user = storage.get(keys::AUTH_USER).and_then(|raw| {
            serde_json::from_str::<Option<User>>(&raw)
                .map_err(|e| warn!(error = %e, "Ignoring unreadable stored user"))
                .ok()
                .flatten()
        });

        let (state, _) = watch::channel(AuthState {
            token,
            user,
            ..AuthState::default()
        });

        let inner = Arc::new(AuthStoreInner {
            api,
            storage,
            i18n,
            state,
            init: Mutex::new(None),
        });

        // The client has already wiped storage; drop the in-memory copy too.
        let weak: Weak<AuthStoreInner> = Arc::downgrade(&inner);
        inner.api.on_unauthorized(Arc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.state.send_modify(|s| {
                    s.token = None;
                    s.user = None;
                });
            }
        }));

        Self { inner }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Watch for state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    /// Signed-in account, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    /// Whether a session is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// Whether the signed-in account is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.inner.state.borrow().is_admin()
    }

    /// Message from the last failed action.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    /// Reset the error message.
    pub fn clear_error(&self) {
        self.inner.state.send_if_modified(|s| s.error.take().is_some());
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Validate the stored session.
    ///
    /// Once initialized, returns the current user without a request unless
    /// `force` is set. Concurrent calls share one in-flight validation. With
    /// no token the session resolves anonymous without a request; a failed
    /// validation logs out. Either way the store ends up initialized.
    pub async fn init_auth(&self, force: bool) -> Option<User> {
        let pending = {
            let mut slot = self.inner.init.lock().unwrap_or_else(PoisonError::into_inner);
            {
                let state = self.inner.state.borrow();
                if state.initialized && !force {
                    return state.user.clone();
                }
            }

            if let Some(pending) = slot.as_ref() {
                debug!("Joining in-flight session validation");
                pending.clone()
            } else {
                let store = self.clone();
                let pending = async move { store.validate_session().await }
                    .boxed()
                    .shared();
                *slot = Some(pending.clone());
                pending
            }
        };

        pending.await
    }

    async fn validate_session(&self) -> Option<User> {
        let has_token = self.inner.state.borrow().token.is_some();

        let user = if has_token {
            match self.fetch_me().await {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "Stored session is no longer valid");
                    self.logout();
                    None
                }
            }
        } else {
            self.inner.state.send_modify(|s| s.user = None);
            None
        };

        self.inner.state.send_modify(|s| s.initialized = true);
        *self.inner.init.lock().unwrap_or_else(PoisonError::into_inner) = None;
        user
    }

    /// Reload the signed-in account and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn fetch_me(&self) -> Result<User, ApiError> {
        let user = self.inner.api.auth().me().await?;
        self.persist_user(&user);
        self.inner.state.send_modify(|s| s.user = Some(user.clone()));
        Ok(user)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the API error; the store's `error` holds its display message.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<User, ApiError> {
        let fallback = self.inner.i18n.pick_localized("Не удалось войти", "Login failed");
        self.authenticate(self.inner.api.auth().login(request), fallback)
            .await
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns the API error; the store's `error` holds its display message.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        let fallback = self
            .inner
            .i18n
            .pick_localized("Не удалось зарегистрироваться", "Registration failed");
        self.authenticate(self.inner.api.auth().register(request), fallback)
            .await
    }

    /// Sign in with a Google ID token.
    ///
    /// # Errors
    ///
    /// Returns the API error; the store's `error` holds its display message.
    #[instrument(skip_all)]
    pub async fn login_with_google(&self, id_token: &str) -> Result<User, ApiError> {
        let fallback = self
            .inner
            .i18n
            .pick_localized("Не удалось войти через Google", "Google login failed");
        self.authenticate(self.inner.api.auth().google(id_token), fallback)
            .await
    }

    async fn authenticate(
        &self,
        request: impl Future<Output = Result<AuthResponse, ApiError>>,
        fallback: &str,
    ) -> Result<User, ApiError> {
        self.inner.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        match request.await {
            Ok(response) => {
                let user = self.set_session(response);
                info!(user_id = %user.id, "Signed in");
                Ok(user)
            }
            Err(e) => {
                let message = error_message(&e, fallback);
                self.inner.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(message);
                });
                Err(e)
            }
        }
    }

    /// End the session. Safe to call when already signed out.
    pub fn logout(&self) {
        self.inner.state.send_modify(|s| {
            s.token = None;
            s.user = None;
            s.error = None;
            s.initialized = true;
        });
        storage::forget(self.inner.storage.as_ref(), keys::ACCESS_TOKEN);
        storage::forget(self.inner.storage.as_ref(), keys::AUTH_USER);
        *self.inner.init.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn set_session(&self, response: AuthResponse) -> User {
        let AuthResponse {
            access_token, user, ..
        } = response;

        storage::persist(self.inner.storage.as_ref(), keys::ACCESS_TOKEN, &access_token);
        self.persist_user(&user);

        self.inner.state.send_modify(|s| {
            s.token = Some(SecretString::from(access_token));
            s.user = Some(user.clone());
            s.loading = false;
            s.initialized = true;
        });
        user
    }

    fn persist_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => storage::persist(self.inner.storage.as_ref(), keys::AUTH_USER, &json),
            Err(e) => warn!(error = %e, "Failed to encode user record"),
        }
    }
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::UserRole;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::i18n::Catalog;
    use crate::storage::MemoryStorage;
    use crate::stores::LocaleStore;

    const USER_JSON: &str =
        r#"{"id":7,"email":"a@example.com","full_name":"Ann","provider":"local","role":"admin"}"#;

    fn store(storage: Arc<MemoryStorage>) -> AuthStore {
        // Nothing listens on this port; tests here never reach the network.
        let config = StorefrontConfig::for_api("http://127.0.0.1:9/api").unwrap();
        let api = ApiClient::new(&config, storage.clone()).unwrap();
        let i18n = I18n::new(
            LocaleStore::new(storage.clone()),
            Arc::new(Catalog::bundled().unwrap()),
        );
        AuthStore::new(api, storage, i18n)
    }

    #[test]
    fn test_restores_persisted_session() {
        let storage = Arc::new(MemoryStorage::with_values([
            (keys::ACCESS_TOKEN, "tok"),
            (keys::AUTH_USER, USER_JSON),
        ]));
        let store = store(storage);
        let state = store.state();
        assert!(state.is_authenticated());
        assert!(state.is_admin());
        assert!(!state.initialized);
        assert_eq!(state.user.unwrap().role, UserRole::Admin);
    }

    #[test]
    fn test_malformed_user_is_absent() {
        let storage = Arc::new(MemoryStorage::with_values([
            (keys::ACCESS_TOKEN, "tok"),
            (keys::AUTH_USER, "{broken"),
        ]));
        let store = store(storage);
        assert!(store.user().is_none());
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_init_without_token_is_anonymous() {
        let store = store(Arc::new(MemoryStorage::new()));
        assert!(store.init_auth(false).await.is_none());
        let state = store.state();
        assert!(state.initialized);
        assert!(!state.is_authenticated());
    }

    #[tokio::test]
    async fn test_init_is_idempotent_once_initialized() {
        let storage = Arc::new(MemoryStorage::with_values([(keys::AUTH_USER, USER_JSON)]));
        let store = store(storage);
        // No token: resolves anonymous and clears the dangling user.
        assert!(store.init_auth(false).await.is_none());
        assert!(store.init_auth(false).await.is_none());
        assert!(store.state().initialized);
    }

    #[test]
    fn test_logout_is_total_and_idempotent() {
        let storage = Arc::new(MemoryStorage::with_values([
            (keys::ACCESS_TOKEN, "tok"),
            (keys::AUTH_USER, USER_JSON),
            (keys::SHOPPING_CART, r#"{"1":1}"#),
        ]));
        let store = store(storage.clone());

        store.logout();
        store.logout();

        let state = store.state();
        assert!(state.token.is_none());
        assert!(state.user.is_none());
        assert!(state.error.is_none());
        assert!(state.initialized);
        assert!(storage.get(keys::ACCESS_TOKEN).is_none());
        assert!(storage.get(keys::AUTH_USER).is_none());
        assert!(storage.get(keys::SHOPPING_CART).is_some());
    }

    #[test]
    fn test_clear_error() {
        let store = store(Arc::new(MemoryStorage::new()));
        store
            .inner
            .state
            .send_modify(|s| s.error = Some("Login failed".to_string()));
        store.clear_error();
        assert!(store.error().is_none());
    }
}
