//! Bilingual record fields.
//!
//! Catalog records carry a generic field plus `_ru` and `_en` variants. The
//! variant for the active locale wins, then the generic field, then the other
//! language's variant. Empty strings count as absent.

use bazaar_core::Locale;

use crate::api::{CartItem, Category, Product};

/// The three spellings of one bilingual field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldVariants<'a> {
    /// Generic (fallback) value.
    pub generic: Option<&'a str>,
    /// Russian value.
    pub ru: Option<&'a str>,
    /// English value.
    pub en: Option<&'a str>,
}

impl<'a> FieldVariants<'a> {
    /// Bundle the three spellings of a field.
    #[must_use]
    pub const fn new(generic: Option<&'a str>, ru: Option<&'a str>, en: Option<&'a str>) -> Self {
        Self { generic, ru, en }
    }

    /// Pick the value to show in `locale`, or `""` when none is usable.
    #[must_use]
    pub fn resolve(&self, locale: Locale) -> &'a str {
        let (own, other) = match locale {
            Locale::Ru => (self.ru, self.en),
            Locale::En => (self.en, self.ru),
        };
        [own, self.generic, other]
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty())
            .unwrap_or_default()
    }
}

/// Records with a bilingual name.
pub trait LocalizedName {
    /// Spellings of the record's name.
    fn name_variants(&self) -> FieldVariants<'_>;
}

impl LocalizedName for Product {
    fn name_variants(&self) -> FieldVariants<'_> {
        FieldVariants::new(
            Some(&self.name),
            self.name_ru.as_deref(),
            self.name_en.as_deref(),
        )
    }
}

impl LocalizedName for Category {
    fn name_variants(&self) -> FieldVariants<'_> {
        FieldVariants::new(
            Some(&self.name),
            self.name_ru.as_deref(),
            self.name_en.as_deref(),
        )
    }
}

impl LocalizedName for CartItem {
    fn name_variants(&self) -> FieldVariants<'_> {
        FieldVariants::new(
            Some(&self.name),
            self.name_ru.as_deref(),
            self.name_en.as_deref(),
        )
    }
}

/// Spellings of a product's description.
#[must_use]
pub fn description_variants(product: &Product) -> FieldVariants<'_> {
    FieldVariants::new(
        product.description.as_deref(),
        product.description_ru.as_deref(),
        product.description_en.as_deref(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_locale_wins() {
        let field = FieldVariants::new(Some("generic"), Some("ру"), Some("en"));
        assert_eq!(field.resolve(Locale::Ru), "ру");
        assert_eq!(field.resolve(Locale::En), "en");
    }

    #[test]
    fn test_generic_before_other_language() {
        let field = FieldVariants::new(Some("generic"), None, Some("en"));
        assert_eq!(field.resolve(Locale::Ru), "generic");
    }

    #[test]
    fn test_other_language_last() {
        let field = FieldVariants::new(None, None, Some("Tea"));
        assert_eq!(field.resolve(Locale::Ru), "Tea");
        let field = FieldVariants::new(Some(""), Some(""), Some("Tea"));
        assert_eq!(field.resolve(Locale::Ru), "Tea");
    }

    #[test]
    fn test_nothing_usable_is_empty() {
        assert_eq!(FieldVariants::default().resolve(Locale::En), "");
        let field = FieldVariants::new(Some(""), Some(""), None);
        assert_eq!(field.resolve(Locale::En), "");
    }
}
