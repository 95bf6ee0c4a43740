//! Cache types for lookup tables.

use std::sync::Arc;

use crate::catalog::{Category, ProductType, Style};

/// Cache key for lookup tables.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Categories,
    ProductTypes,
    Styles,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Categories(Arc<Vec<Category>>),
    ProductTypes(Arc<Vec<ProductType>>),
    Styles(Arc<Vec<Style>>),
}
