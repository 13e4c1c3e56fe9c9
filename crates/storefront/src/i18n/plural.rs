//! Pluralization rules.
//!
//! English uses two forms (one, other). Russian uses three for integers:
//! one (1, 21, 31, ...), few (2-4, 22-24, ...) and many (everything else).

use bazaar_core::Locale;

/// Grammatical plural form, as used for message sub-table keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    /// Singular-like form.
    One,
    /// Paucal form (Slavic languages).
    Few,
    /// Plural form for large counts (Slavic languages).
    Many,
    /// General plural form.
    Other,
}

impl PluralCategory {
    /// Key of this form in a message sub-table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::One => "one",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Select the plural form for `count` in `locale`.
///
/// Only the magnitude matters: `-21` selects the same form as `21`.
///
/// ```rust
/// # use bazaar_core::Locale;
/// # use bazaar_storefront::i18n::{plural_category, PluralCategory};
/// assert_eq!(plural_category(Locale::Ru, 21), PluralCategory::One);
/// assert_eq!(plural_category(Locale::Ru, 22), PluralCategory::Few);
/// assert_eq!(plural_category(Locale::Ru, 25), PluralCategory::Many);
/// assert_eq!(plural_category(Locale::En, 1), PluralCategory::One);
/// assert_eq!(plural_category(Locale::En, 0), PluralCategory::Other);
/// ```
#[must_use]
pub const fn plural_category(locale: Locale, count: i64) -> PluralCategory {
    let n = count.unsigned_abs();
    match locale {
        Locale::En => {
            if n == 1 {
                PluralCategory::One
            } else {
                PluralCategory::Other
            }
        }
        Locale::Ru => {
            let mod10 = n % 10;
            let mod100 = n % 100;
            if mod10 == 1 && mod100 != 11 {
                PluralCategory::One
            } else if mod10 >= 2 && mod10 <= 4 && (mod100 < 12 || mod100 > 14) {
                PluralCategory::Few
            } else {
                PluralCategory::Many
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_russian_one() {
        for n in [1, 21, 31, 101, 1001] {
            assert_eq!(plural_category(Locale::Ru, n), PluralCategory::One, "n = {n}");
        }
    }

    #[test]
    fn test_russian_few() {
        for n in [2, 3, 4, 22, 23, 24, 102] {
            assert_eq!(plural_category(Locale::Ru, n), PluralCategory::Few, "n = {n}");
        }
    }

    #[test]
    fn test_russian_many() {
        for n in [0, 5, 11, 12, 13, 14, 15, 20, 25, 111, 112] {
            assert_eq!(plural_category(Locale::Ru, n), PluralCategory::Many, "n = {n}");
        }
    }

    #[test]
    fn test_english() {
        assert_eq!(plural_category(Locale::En, 1), PluralCategory::One);
        assert_eq!(plural_category(Locale::En, -1), PluralCategory::One);
        assert_eq!(plural_category(Locale::En, 0), PluralCategory::Other);
        assert_eq!(plural_category(Locale::En, 2), PluralCategory::Other);
        assert_eq!(plural_category(Locale::En, 21), PluralCategory::Other);
    }

    #[test]
    fn test_negative_uses_magnitude() {
        assert_eq!(plural_category(Locale::Ru, -21), PluralCategory::One);
        assert_eq!(plural_category(Locale::Ru, -3), PluralCategory::Few);
    }
}
