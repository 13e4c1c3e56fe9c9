//! Authentication endpoints.

use reqwest::Method;
use tracing::instrument;

use super::ApiClient;
use super::types::{AuthResponse, GoogleLoginRequest, LoginRequest, RegisterRequest, User};
use crate::error::ApiError;

/// Authentication endpoints: `/auth`.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Create an account and open a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the registration or the request fails.
    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn register(&self, payload: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.client
            .send_json(Method::POST, "auth/register", payload)
            .await
    }

    /// Open a session with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn login(&self, payload: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.client
            .send_json(Method::POST, "auth/login", payload)
            .await
    }

    /// Open a session with a Google ID token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, id_token))]
    pub async fn google(&self, id_token: &str) -> Result<AuthResponse, ApiError> {
        self.client
            .send_json(Method::POST, "auth/google", &GoogleLoginRequest { id_token })
            .await
    }

    /// Fetch the account behind the stored token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the token is missing or expired.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<User, ApiError> {
        self.client.get("auth/me").await
    }
}
