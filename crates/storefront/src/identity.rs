//! Google Identity Services client loader.
//!
//! Sign-in with Google needs the provider's client script, localized through
//! the `hl` query parameter. The loader keeps at most one loaded client:
//!
//! - A client already loaded for the requested locale is returned as is
//! - Asking for another locale discards the loaded or loading client
//! - Concurrent requests for the same locale share one load
//! - A failed load is forgotten, so the next request retries
//!
//! Fetching goes through [`ScriptTransport`]; [`HttpScriptTransport`] is the
//! default.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use bazaar_core::Locale;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Base URL of the Google Identity Services client script.
pub const GOOGLE_SCRIPT_URL: &str = "https://accounts.google.com/gsi/client";

/// Errors that can occur when loading the identity client.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// The script could not be fetched.
    #[error("Google script failed to load: {0}")]
    Load(String),

    /// The script URL could not be built.
    #[error("Invalid script URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Fetches the identity client script.
#[async_trait]
pub trait ScriptTransport: Send + Sync {
    /// Download the script at `url`.
    async fn fetch(&self, url: &Url) -> Result<String, IdentityError>;
}

/// Fetches the script over HTTP.
#[derive(Debug, Clone)]
pub struct HttpScriptTransport {
    client: reqwest::Client,
}

impl HttpScriptTransport {
    /// Create a transport with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait]
impl ScriptTransport for HttpScriptTransport {
    async fn fetch(&self, url: &Url) -> Result<String, IdentityError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| IdentityError::Load(e.to_string()))?;

        response
            .text()
            .await
            .map_err(|e| IdentityError::Load(e.to_string()))
    }
}

/// A loaded identity client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClient {
    /// Locale the client was loaded for.
    pub locale: Locale,
    /// Where the script was loaded from.
    pub script_url: Url,
    /// Script source.
    pub script: Arc<str>,
}

type LoadFuture = Shared<BoxFuture<'static, Result<IdentityClient, IdentityError>>>;

#[derive(Default)]
struct LoaderSlot {
    /// Locale of the current (loaded or loading) client.
    locale: Option<Locale>,
    /// Bumped whenever the current client is discarded.
    generation: u64,
    loaded: Option<IdentityClient>,
    pending: Option<LoadFuture>,
}

/// Loads and caches the identity client for one locale at a time.
#[derive(Clone)]
pub struct IdentityLoader {
    inner: Arc<IdentityLoaderInner>,
}

struct IdentityLoaderInner {
    transport: Arc<dyn ScriptTransport>,
    slot: Mutex<LoaderSlot>,
}

impl IdentityLoader {
    /// Create a loader over `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn ScriptTransport>) -> Self {
        Self {
            inner: Arc::new(IdentityLoaderInner {
                transport,
                slot: Mutex::new(LoaderSlot::default()),
            }),
        }
    }

    /// Locale of the loaded client, if one is loaded.
    #[must_use]
    pub fn loaded_locale(&self) -> Option<Locale> {
        self.lock().loaded.as_ref().map(|c| c.locale)
    }

    /// Get the client for `locale`, loading it if needed.
    ///
    /// Any tag other than `en` selects Russian.
    ///
    /// # Errors
    ///
    /// Returns an error if the script cannot be fetched.
    #[instrument(skip(self))]
    pub async fn ensure_loaded(&self, locale: &str) -> Result<IdentityClient, IdentityError> {
        let locale = Locale::normalize(Some(locale));

        let pending = {
            let mut slot = self.lock();

            if slot.locale == Some(locale) {
                if let Some(client) = &slot.loaded {
                    return Ok(client.clone());
                }
            } else {
                if slot.locale.is_some() {
                    debug!(from = ?slot.locale, to = %locale, "Discarding identity client for locale change");
                }
                slot.generation += 1;
                slot.locale = Some(locale);
                slot.loaded = None;
                slot.pending = None;
            }

            if let Some(pending) = &slot.pending {
                pending.clone()
            } else {
                let loader = self.clone();
                let generation = slot.generation;
                let pending = async move { loader.load(locale, generation).await }
                    .boxed()
                    .shared();
                slot.pending = Some(pending.clone());
                pending
            }
        };

        pending.await
    }

    /// Forget the loaded client.
    pub fn reset(&self) {
        let mut slot = self.lock();
        *slot = LoaderSlot {
            generation: slot.generation + 1,
            ..LoaderSlot::default()
        };
    }

    async fn load(&self, locale: Locale, generation: u64) -> Result<IdentityClient, IdentityError> {
        let result = match script_url(locale) {
            Ok(script_url) => self
                .inner
                .transport
                .fetch(&script_url)
                .await
                .map(|script| IdentityClient {
                    locale,
                    script_url,
                    script: Arc::from(script),
                }),
            Err(e) => Err(e),
        };

        let mut slot = self.lock();
        if slot.generation == generation {
            slot.pending = None;
            match &result {
                Ok(client) => {
                    info!(locale = %locale, "Identity client loaded");
                    slot.loaded = Some(client.clone());
                }
                Err(e) => warn!(locale = %locale, error = %e, "Identity client failed to load"),
            }
        }
        result
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LoaderSlot> {
        self.inner.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for IdentityLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityLoader")
            .field("loaded_locale", &self.loaded_locale())
            .finish_non_exhaustive()
    }
}

/// Script URL for `locale`.
///
/// # Errors
///
/// Returns an error if the base URL cannot be parsed.
pub fn script_url(locale: Locale) -> Result<Url, IdentityError> {
    Ok(Url::parse_with_params(
        GOOGLE_SCRIPT_URL,
        &[("hl", locale.as_str())],
    )?)
}
