//! Message catalog: nested JSON tables, one per locale.

use std::collections::HashMap;

use bazaar_core::Locale;
use serde_json::Value;

/// Locale whose table backs up missing keys in every other table.
pub const FALLBACK_LOCALE: Locale = Locale::En;

const BUNDLED_RU: &str = include_str!("../../messages/ru.json");
const BUNDLED_EN: &str = include_str!("../../messages/en.json");

/// Per-locale message tables addressed by dotted paths (`cart.items`).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: HashMap<Locale, Value>,
}

impl Catalog {
    /// The catalog shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if a bundled table is not valid JSON.
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Ok(Self::from_tables([
            (Locale::Ru, serde_json::from_str(BUNDLED_RU)?),
            (Locale::En, serde_json::from_str(BUNDLED_EN)?),
        ]))
    }

    /// Build a catalog from explicit tables.
    #[must_use]
    pub fn from_tables(tables: impl IntoIterator<Item = (Locale, Value)>) -> Self {
        Self {
            tables: tables.into_iter().collect(),
        }
    }

    /// Resolve `key` in `locale`, then in [`FALLBACK_LOCALE`].
    ///
    /// The result may be a string or a sub-table.
    #[must_use]
    pub fn lookup(&self, locale: Locale, key: &str) -> Option<&Value> {
        self.lookup_in(locale, key)
            .or_else(|| self.lookup_in(FALLBACK_LOCALE, key))
    }

    fn lookup_in(&self, locale: Locale, key: &str) -> Option<&Value> {
        self.tables
            .get(&locale)
            .and_then(|table| get_nested(table, key))
    }
}

/// Walk a dotted path through nested JSON objects.
fn get_nested<'a>(source: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(source, |current, segment| current.as_object()?.get(segment))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_bundled_catalog_parses() {
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(
            catalog.lookup(Locale::Ru, "cart.title"),
            Some(&json!("Корзина"))
        );
        assert_eq!(
            catalog.lookup(Locale::En, "cart.title"),
            Some(&json!("Shopping Cart"))
        );
    }

    #[test]
    fn test_lookup_falls_back_to_english() {
        let catalog = Catalog::from_tables([
            (Locale::Ru, json!({"a": {"b": "ру"}})),
            (Locale::En, json!({"a": {"b": "en", "c": "only en"}})),
        ]);
        assert_eq!(catalog.lookup(Locale::Ru, "a.b"), Some(&json!("ру")));
        assert_eq!(catalog.lookup(Locale::Ru, "a.c"), Some(&json!("only en")));
        assert_eq!(catalog.lookup(Locale::Ru, "a.d"), None);
    }

    #[test]
    fn test_lookup_through_non_object_is_none() {
        let catalog = Catalog::from_tables([(Locale::En, json!({"a": "leaf"}))]);
        assert_eq!(catalog.lookup(Locale::En, "a.b"), None);
    }

    #[test]
    fn test_bundled_tables_have_matching_keys() {
        fn leaves(prefix: &str, value: &Value, out: &mut Vec<String>) {
            if let Some(map) = value.as_object() {
                for (k, v) in map {
                    let path = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    // plural tables legitimately differ in their form keys
                    if v.as_object().is_some_and(|m| m.contains_key("one")) {
                        out.push(path);
                    } else {
                        leaves(&path, v, out);
                    }
                }
            } else {
                out.push(prefix.to_string());
            }
        }

        let ru: Value = serde_json::from_str(BUNDLED_RU).unwrap();
        let en: Value = serde_json::from_str(BUNDLED_EN).unwrap();
        let (mut ru_keys, mut en_keys) = (Vec::new(), Vec::new());
        leaves("", &ru, &mut ru_keys);
        leaves("", &en, &mut en_keys);
        ru_keys.sort();
        en_keys.sort();
        assert_eq!(ru_keys, en_keys);
    }
}
