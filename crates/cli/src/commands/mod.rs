//! Subcommand implementations.
//!
//! Every command prints through the message catalog, so output follows the
//! language chosen with `bazaar locale set`.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod locale;
pub mod products;
pub mod route;

use bazaar_storefront::AppState;
use bazaar_storefront::error::{ApiError, error_message};
use bazaar_storefront::identity::IdentityError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A store action failed; carries the localized message.
    #[error("{0}")]
    Failed(String),

    /// The identity client could not be loaded.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// A local file could not be read.
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CommandError {
    /// Failure reported by a store through its `error` field.
    pub(crate) fn from_store(state: &AppState, error: Option<String>) -> Self {
        Self::Failed(error.unwrap_or_else(|| state.i18n().t("common.error", &[])))
    }

    /// Failure of a direct API call.
    pub(crate) fn from_api(state: &AppState, error: &ApiError) -> Self {
        Self::Failed(error_message(error, &state.i18n().t("common.error", &[])))
    }
}
