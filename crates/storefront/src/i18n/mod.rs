//! Localization: message lookup, pluralization and display formatting.
//!
//! # Overview
//!
//! [`I18n`] resolves dotted message keys against the bundled [`Catalog`] for
//! the locale held by a [`LocaleStore`]. Lookups fall back to English, then to
//! the key itself, so a missing translation never renders as an empty string.
//!
//! ```rust,ignore
//! let i18n = I18n::new(locale_store, Arc::new(Catalog::bundled()?));
//! i18n.t("cart.total", &[("total", "KGS 10.00")]);
//! i18n.t_plural("cart.items", 3, &[]);
//! ```

mod catalog;
mod fields;
mod format;
mod plural;

use std::sync::{Arc, LazyLock};

use bazaar_core::Locale;
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::api::{Category, Product};
use crate::stores::LocaleStore;

pub use catalog::{Catalog, FALLBACK_LOCALE};
pub use fields::{FieldVariants, LocalizedName, description_variants};
pub use format::{CURRENCY_CODE, format_currency, format_date};
pub use plural::{PluralCategory, plural_category};

/// `{name}` placeholders in message templates.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("Invalid regex"));

/// Translator bound to the active locale.
#[derive(Debug, Clone)]
pub struct I18n {
    locale: LocaleStore,
    catalog: Arc<Catalog>,
}

impl I18n {
    /// Create a translator over `catalog` that follows `locale`.
    #[must_use]
    pub const fn new(locale: LocaleStore, catalog: Arc<Catalog>) -> Self {
        Self { locale, catalog }
    }

    /// Active locale.
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale.locale()
    }

    /// The locale store this translator follows.
    #[must_use]
    pub const fn locale_store(&self) -> &LocaleStore {
        &self.locale
    }

    /// Translate `key` and fill `{placeholders}` from `params`.
    ///
    /// Returns the key itself when no locale has a string at that path.
    #[must_use]
    pub fn t(&self, key: &str, params: &[(&str, &str)]) -> String {
        match self.catalog.lookup(self.locale(), key) {
            Some(Value::String(template)) => interpolate(template, params),
            _ => key.to_string(),
        }
    }

    /// Translate a count-dependent message.
    ///
    /// `key` should name a table of plural forms. The form for `count` is
    /// chosen by the active locale's rules, falling back to `other`, then
    /// `one`, then the empty string. `{count}` is always available to the
    /// template. Keys that are not tables are translated as by [`Self::t`].
    #[must_use]
    pub fn t_plural(&self, key: &str, count: i64, params: &[(&str, &str)]) -> String {
        let count_text = count.to_string();
        let mut all_params = Vec::with_capacity(params.len() + 1);
        all_params.extend_from_slice(params);
        all_params.push(("count", count_text.as_str()));

        let locale = self.locale();
        let Some(Value::Object(forms)) = self.catalog.lookup(locale, key) else {
            return self.t(key, &all_params);
        };

        let form = plural_category(locale, count);
        let template = [form.as_str(), "other", "one"]
            .into_iter()
            .find_map(|name| forms.get(name).and_then(Value::as_str))
            .unwrap_or_default();
        interpolate(template, &all_params)
    }

    /// Choose between two literal strings by the active locale.
    #[must_use]
    pub fn pick_localized<'a>(&self, ru: &'a str, en: &'a str) -> &'a str {
        match self.locale() {
            Locale::Ru => ru,
            Locale::En => en,
        }
    }

    /// Format an amount in the storefront currency.
    #[must_use]
    pub fn format_currency(&self, amount: Decimal) -> String {
        format_currency(amount, self.locale())
    }

    /// Format a server timestamp as a long date.
    #[must_use]
    pub fn format_date(&self, value: &str) -> String {
        format_date(value, self.locale())
    }

    /// Display name of any bilingual record.
    #[must_use]
    pub fn localized_name<T: LocalizedName + ?Sized>(&self, record: Option<&T>) -> String {
        record
            .map(|r| r.name_variants().resolve(self.locale()).to_string())
            .unwrap_or_default()
    }

    /// Display name of a product.
    #[must_use]
    pub fn localized_product_name(&self, product: Option<&Product>) -> String {
        self.localized_name(product)
    }

    /// Display description of a product.
    #[must_use]
    pub fn localized_product_description(&self, product: Option<&Product>) -> String {
        product
            .map(|p| description_variants(p).resolve(self.locale()).to_string())
            .unwrap_or_default()
    }

    /// Display name of a category.
    #[must_use]
    pub fn localized_category_name(&self, category: Option<&Category>) -> String {
        self.localized_name(category)
    }
}

/// Replace `{name}` with the matching parameter; unknown names stay as is.
fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let name = caps.get(1).map_or("", |m| m.as_str());
            params
                .iter()
                .find(|(key, _)| *key == name)
                .map_or(whole, |&(_, value)| value)
                .to_string()
        })
        .into_owned()
}
