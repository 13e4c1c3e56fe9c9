//! Currency and date formatting.
//!
//! Output follows the conventions shoppers expect in each locale: the
//! storefront sells in Kyrgyz som (KGS) and shows long-form dates.

use bazaar_core::Locale;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

/// ISO 4217 code of the storefront currency.
pub const CURRENCY_CODE: &str = "KGS";

const NBSP: char = '\u{a0}';

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Genitive month names, as used after a day number.
const MONTHS_RU_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Format an amount in KGS with two fraction digits.
///
/// ```rust
/// # use bazaar_core::Locale;
/// # use bazaar_storefront::i18n::format_currency;
/// # use rust_decimal::Decimal;
/// let amount = Decimal::new(123_450, 2);
/// assert_eq!(format_currency(amount, Locale::En), "KGS\u{a0}1,234.50");
/// assert_eq!(format_currency(amount, Locale::Ru), "1\u{a0}234,50\u{a0}сом");
/// ```
#[must_use]
pub fn format_currency(amount: Decimal, locale: Locale) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    match locale {
        Locale::Ru => format!(
            "{sign}{},{frac_part}{NBSP}сом",
            add_grouping(int_part, NBSP)
        ),
        Locale::En => format!(
            "{sign}{CURRENCY_CODE}{NBSP}{}.{frac_part}",
            add_grouping(int_part, ',')
        ),
    }
}

/// Format a server timestamp as a long date.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS[.f]` timestamps
/// and plain `YYYY-MM-DD` dates. Anything else is returned unchanged.
///
/// ```rust
/// # use bazaar_core::Locale;
/// # use bazaar_storefront::i18n::format_date;
/// assert_eq!(format_date("2026-10-17T09:30:00Z", Locale::En), "October 17, 2026");
/// assert_eq!(format_date("2026-10-17", Locale::Ru), "17 октября 2026 г.");
/// ```
#[must_use]
pub fn format_date(value: &str, locale: Locale) -> String {
    parse_date(value.trim()).map_or_else(|| value.to_string(), |date| long_date(date, locale))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()
}

fn long_date(date: NaiveDate, locale: Locale) -> String {
    let month_index = date.month0() as usize;
    match locale {
        Locale::Ru => {
            let month = MONTHS_RU_GENITIVE.get(month_index).copied().unwrap_or_default();
            format!("{} {month} {} г.", date.day(), date.year())
        }
        Locale::En => {
            let month = MONTHS_EN.get(month_index).copied().unwrap_or_default();
            format!("{month} {}, {}", date.day(), date.year())
        }
    }
}

/// Insert `sep` between groups of three digits.
fn add_grouping(digits: &str, sep: char) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(digits.len() + len / 3 * sep.len_utf8());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}
