//! Display locales supported by the storefront.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a [`Locale`] from a strict source.
#[derive(Debug, Clone, Error)]
#[error("unsupported locale: {0}. Supported locales: ru, en")]
pub struct LocaleError(pub String);

/// A storefront display language.
///
/// The set is closed: Russian is the store default, English the alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Russian (store default).
    #[default]
    Ru,
    /// English.
    En,
}

impl Locale {
    /// All supported locales.
    pub const ALL: [Self; 2] = [Self::Ru, Self::En];

    /// Language tag used in storage and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ru => "ru",
            Self::En => "en",
        }
    }

    /// The other supported locale.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Ru => Self::En,
            Self::En => Self::Ru,
        }
    }

    /// Lenient parse: anything that is not a supported tag becomes the default.
    ///
    /// ```rust
    /// # use bazaar_core::Locale;
    /// assert_eq!(Locale::normalize(Some("en")), Locale::En);
    /// assert_eq!(Locale::normalize(Some("de")), Locale::Ru);
    /// assert_eq!(Locale::normalize(None), Locale::Ru);
    /// ```
    #[must_use]
    pub fn normalize(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ru" => Ok(Self::Ru),
            "en" => Ok(Self::En),
            _ => Err(LocaleError(s.to_string())),
        }
    }
}
