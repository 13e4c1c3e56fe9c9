//! Cart line map: product id to desired quantity.
//!
//! The map is what the client persists between sessions and sends to the
//! server on every cart call. Every entry has a positive product id and a
//! positive quantity; anything else is dropped on the way in, whether it
//! comes from a server response or from local storage.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::id::ProductId;

/// Mapping from product id to quantity.
///
/// Serializes as a JSON object keyed by decimal product id, e.g.
/// `{"3": 2, "17": 1}`. Deserialization never fails on entry content:
/// malformed entries are silently discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CartLines(BTreeMap<ProductId, u32>);

impl CartLines {
    /// Create an empty cart map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build a map from raw JSON, keeping only positive-integer entries.
    ///
    /// Non-object input yields an empty map.
    ///
    /// ```rust
    /// # use bazaar_core::{CartLines, ProductId};
    /// let raw = serde_json::json!({"1": 2, "2": 0, "x": 1, "3": "4", "4": 1.5});
    /// let lines = CartLines::normalize(&raw);
    /// assert_eq!(lines.len(), 2);
    /// assert_eq!(lines.get(ProductId::new(3)), Some(4));
    /// ```
    #[must_use]
    pub fn normalize(raw: &Value) -> Self {
        let Some(object) = raw.as_object() else {
            return Self::new();
        };

        let lines = object
            .iter()
            .filter_map(|(key, value)| {
                let id = parse_positive_key(key)?;
                let quantity = positive_integer(value).and_then(|q| u32::try_from(q).ok())?;
                Some((ProductId::new(id), quantity))
            })
            .collect();

        Self(lines)
    }

    /// Quantity for a product, if present.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<u32> {
        self.0.get(&product_id).copied()
    }

    /// Set a quantity. Zero removes the entry; non-positive ids are ignored.
    pub fn set(&mut self, product_id: ProductId, quantity: u32) {
        if !product_id.is_positive() {
            return;
        }
        if quantity == 0 {
            self.0.remove(&product_id);
        } else {
            self.0.insert(product_id, quantity);
        }
    }

    /// Remove a product, returning its previous quantity.
    pub fn remove(&mut self, product_id: ProductId) -> Option<u32> {
        self.0.remove(&product_id)
    }

    /// Whether the product is in the map.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.0.contains_key(&product_id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.0.values().map(|&q| u64::from(q)).sum()
    }

    /// Iterate entries in ascending product id order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.0.iter().map(|(&id, &q)| (id, q))
    }
}

impl<'de> Deserialize<'de> for CartLines {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::normalize(&raw))
    }
}

impl FromIterator<(ProductId, u32)> for CartLines {
    fn from_iter<T: IntoIterator<Item = (ProductId, u32)>>(iter: T) -> Self {
        let mut lines = Self::new();
        for (id, quantity) in iter {
            lines.set(id, quantity);
        }
        lines
    }
}

/// Parse a map key as a positive integer id.
fn parse_positive_key(key: &str) -> Option<i64> {
    positive_from_f64(key.trim().parse::<f64>().ok()?).and_then(|n| i64::try_from(n).ok())
}

/// Interpret a JSON value as a positive integer.
///
/// Accepts integral numbers (including `2.0`) and numeric strings.
fn positive_integer(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .filter(|&n| n > 0)
            .or_else(|| n.as_f64().and_then(positive_from_f64)),
        Value::String(s) => positive_from_f64(s.trim().parse::<f64>().ok()?),
        _ => None,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)] // range and integrality are checked before the cast
fn positive_from_f64(n: f64) -> Option<u64> {
    if n.is_finite() && n.fract() == 0.0 && n >= 1.0 && n <= u64::MAX as f64 {
        Some(n as u64)
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_normalize_drops_invalid_entries() {
        let raw = json!({
            "1": 2,
            "2": 0,
            "3": -1,
            "4": 1.5,
            "5": "3",
            "abc": 1,
            "-7": 1,
            "0": 1,
            "6": null,
            "7": true,
            "8": 2.0,
        });
        let lines = CartLines::normalize(&raw);
        let entries: Vec<_> = lines.iter().map(|(id, q)| (id.as_i64(), q)).collect();
        assert_eq!(entries, vec![(1, 2), (5, 3), (8, 2)]);
    }

    #[test]
    fn test_normalize_non_object_is_empty() {
        assert!(CartLines::normalize(&json!([1, 2, 3])).is_empty());
        assert!(CartLines::normalize(&json!("cart")).is_empty());
        assert!(CartLines::normalize(&Value::Null).is_empty());
    }

    #[test]
    fn test_deserialize_normalizes() {
        let lines: CartLines = serde_json::from_str(r#"{"10": 1, "11": -4}"#).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.get(ProductId::new(10)), Some(1));
    }

    #[test]
    fn test_serializes_with_string_keys() {
        let lines: CartLines = [(ProductId::new(3), 2), (ProductId::new(12), 1)]
            .into_iter()
            .collect();
        assert_eq!(serde_json::to_string(&lines).unwrap(), r#"{"3":2,"12":1}"#);
    }

    #[test]
    fn test_set_zero_removes() {
        let mut lines = CartLines::new();
        lines.set(ProductId::new(1), 3);
        lines.set(ProductId::new(1), 0);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_set_ignores_non_positive_ids() {
        let mut lines = CartLines::new();
        lines.set(ProductId::new(0), 3);
        lines.set(ProductId::new(-2), 3);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_total_quantity() {
        let lines: CartLines = [(ProductId::new(1), 2), (ProductId::new(2), 5)]
            .into_iter()
            .collect();
        assert_eq!(lines.total_quantity(), 7);
    }
}
