//! Account commands.

use bazaar_storefront::AppState;
use bazaar_storefront::api::{LoginRequest, RegisterRequest, User};

use super::CommandError;

/// Sign in with email and password.
///
/// # Errors
///
/// Returns an error if the credentials are rejected.
pub async fn login(state: &AppState, email: String, password: String) -> Result<(), CommandError> {
    let request = LoginRequest { email, password };
    let user = state
        .auth()
        .login(&request)
        .await
        .map_err(|_| CommandError::from_store(state, state.auth().error()))?;
    print_signed_in(state, &user, "auth.signed_in");
    Ok(())
}

/// Create an account.
///
/// # Errors
///
/// Returns an error if the server rejects the registration.
pub async fn register(
    state: &AppState,
    email: String,
    full_name: String,
    password: String,
) -> Result<(), CommandError> {
    let request = RegisterRequest {
        email,
        full_name,
        password,
    };
    let user = state
        .auth()
        .register(&request)
        .await
        .map_err(|_| CommandError::from_store(state, state.auth().error()))?;
    print_signed_in(state, &user, "auth.registered");
    Ok(())
}

/// Sign in with a Google ID token.
///
/// # Errors
///
/// Returns an error if the token is rejected.
pub async fn google(state: &AppState, id_token: &str) -> Result<(), CommandError> {
    let user = state
        .auth()
        .login_with_google(id_token)
        .await
        .map_err(|_| CommandError::from_store(state, state.auth().error()))?;
    print_signed_in(state, &user, "auth.signed_in");
    Ok(())
}

/// Load the Google sign-in client for the current language.
///
/// # Errors
///
/// Returns an error if the client script cannot be fetched.
#[allow(clippy::print_stdout)]
pub async fn identity(state: &AppState) -> Result<(), CommandError> {
    let locale = state.i18n().locale();
    let client = state.identity().ensure_loaded(locale.as_str()).await?;
    println!(
        "{}",
        state
            .i18n()
            .t("auth.identity_loaded", &[("locale", client.locale.as_str())])
    );
    println!("  {}", client.script_url);
    match state.config().identity_client_id() {
        Some(client_id) => println!(
            "  {}",
            state
                .i18n()
                .t("auth.identity_client_id", &[("client_id", client_id)])
        ),
        None => println!("  {}", state.i18n().t("auth.identity_no_client_id", &[])),
    }
    Ok(())
}

/// Sign out.
#[allow(clippy::print_stdout)]
pub fn logout(state: &AppState) {
    state.auth().logout();
    println!("{}", state.i18n().t("auth.signed_out", &[]));
}

/// Show the signed-in account, validating the stored session first.
#[allow(clippy::print_stdout)]
pub async fn whoami(state: &AppState) {
    let i18n = state.i18n();
    match state.auth().init_auth(false).await {
        Some(user) => println!(
            "{}",
            i18n.t(
                "auth.whoami",
                &[
                    ("name", display_name(&user)),
                    ("email", user.email.as_str()),
                    ("role", user.role.as_str()),
                ],
            )
        ),
        None => println!("{}", i18n.t("auth.anonymous", &[])),
    }
}

#[allow(clippy::print_stdout)]
fn print_signed_in(state: &AppState, user: &User, message_key: &str) {
    println!(
        "{}",
        state
            .i18n()
            .t(message_key, &[("name", display_name(user))])
    );
}

fn display_name(user: &User) -> &str {
    if user.full_name.trim().is_empty() {
        &user.email
    } else {
        &user.full_name
    }
}
