//! Cache types for catalog lookups.

use bazaar_core::ProductId;

use crate::api::{Category, Product};

/// Cache key for single products and the category list.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Categories,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Categories(Vec<Category>),
}
