//! Product page.
//!
//! Loads a product with its colors, stock rows and top reviews, and tracks
//! the shopper's color and size selection.

mod variant;

pub use variant::{SizeSlot, VariantSelection};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use liftfit_core::{
    CategoryId, ColorId, Gender, Pricing, ProductId, Size, StockId, StyleId, TypeId,
};

use crate::backend::{BackendError, null_as_default};
use crate::catalog::{CatalogSource, is_new_item, pricing_from_row};
use crate::reviews::{Review, ReviewImages, TOP_REVIEWS_LIMIT};

/// Embedded `name` of a joined lookup row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NameRef {
    pub name: String,
}

/// A product row joined with its category, type and style names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductDetail {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub discount: Option<Decimal>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub type_id: Option<TypeId>,
    #[serde(default)]
    pub style_id: Option<StyleId>,
    #[serde(default)]
    pub gender: Option<Gender>,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_urls: Vec<String>,
    #[serde(default, rename = "product_categories")]
    pub category: Option<NameRef>,
    #[serde(default, rename = "product_types")]
    pub product_type: Option<NameRef>,
    #[serde(default, rename = "product_styles")]
    pub style: Option<NameRef>,
}

impl ProductDetail {
    /// Columns and joins requested for the product page.
    pub const SELECT_COLUMNS: &'static str =
        "*,product_styles(name),product_types(name),product_categories(name)";

    #[must_use]
    pub fn pricing(&self) -> Pricing {
        pricing_from_row(self.price, self.discount)
    }

    /// Whether the product carries the "new" tag at `now`.
    #[must_use]
    pub fn is_new_item(&self, now: DateTime<Utc>) -> bool {
        is_new_item(self.created_at, now)
    }

    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|n| n.name.as_str())
    }

    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.product_type.as_ref().map(|n| n.name.as_str())
    }

    #[must_use]
    pub fn style_name(&self) -> Option<&str> {
        self.style.as_ref().map(|n| n.name.as_str())
    }
}

/// A row in `product_colors`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductColor {
    pub id: ColorId,
    pub product_id: ProductId,
    /// Display name, e.g. "Black".
    pub color: String,
    #[serde(default)]
    pub hex: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_urls: Vec<String>,
}

/// A row in `product_stocks`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductStock {
    pub id: StockId,
    pub product_color_id: ColorId,
    /// Size label as stored (`"XS"` ... `"3XL"`).
    pub size: String,
    /// Units on hand; may be negative.
    pub stock: i32,
}

impl ProductStock {
    /// Parsed size; `None` for labels outside the size range.
    #[must_use]
    pub fn size(&self) -> Option<Size> {
        Size::from_label(&self.size)
    }
}

/// Everything the product page shows.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub detail: ProductDetail,
    pub variants: VariantSelection,
    pub reviews: Vec<Review>,
}

impl ProductPage {
    /// Load a product page. A missing product is `Ok(None)`.
    ///
    /// Variant and review failures are logged and leave those parts empty;
    /// only the product fetch itself is fatal.
    ///
    /// # Errors
    ///
    /// Returns an error if the product row cannot be fetched.
    #[instrument(skip(source, images), fields(product_id = %id))]
    pub async fn load<S: CatalogSource>(
        source: &S,
        images: &ReviewImages,
        id: ProductId,
    ) -> Result<Option<Self>, BackendError> {
        let (detail, variants, reviews) = tokio::join!(
            source.product(id),
            load_variants(source, id),
            source.top_reviews(id, TOP_REVIEWS_LIMIT),
        );

        let Some(detail) = detail? else {
            tracing::debug!("Product not found");
            return Ok(None);
        };

        let variants = variants
            .inspect_err(|e| tracing::error!(error = %e, "Error fetching product stock"))
            .unwrap_or_else(|_| VariantSelection::new(Vec::new(), Vec::new()));

        let reviews = reviews
            .map(|rows| images.resolve_all(rows))
            .inspect_err(|e| tracing::error!(error = %e, "Error fetching reviews"))
            .unwrap_or_default();

        Ok(Some(Self {
            detail,
            variants,
            reviews,
        }))
    }
}

/// Fetch colors, then the stock rows for those colors.
async fn load_variants<S: CatalogSource>(
    source: &S,
    product: ProductId,
) -> Result<VariantSelection, BackendError> {
    let colors = source.colors(product).await?;
    let ids: Vec<ColorId> = colors.iter().map(|c| c.id).collect();
    let stocks = if ids.is_empty() {
        Vec::new()
    } else {
        source.stocks(&ids).await?
    };
    Ok(VariantSelection::new(colors, stocks))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn detail_json() -> serde_json::Value {
        serde_json::json!({
            "id": "0b8f9c3e-6a9e-4b55-a1e2-0c6d1b7a2f10",
            "name": "Pump Cover Hoodie",
            "description": "Oversized fit.",
            "price": 100.0,
            "discount": 0.25,
            "category_id": 1,
            "type_id": 3,
            "style_id": "5c0e3a8a-1c57-4f0e-9a3e-3a4f8f1d2b6c",
            "gender": "Men",
            "created_at": "2026-01-01T00:00:00Z",
            "image_urls": ["https://cdn.example.com/a.jpg"],
            "product_categories": { "name": "Tops" },
            "product_types": { "name": "hoodies" },
            "product_styles": null
        })
    }

    #[test]
    fn test_detail_joins() {
        let detail: ProductDetail = serde_json::from_value(detail_json()).unwrap();
        assert_eq!(detail.category_name(), Some("Tops"));
        assert_eq!(detail.type_name(), Some("hoodies"));
        assert_eq!(detail.style_name(), None);
        assert_eq!(detail.gender, Some(Gender::Men));
    }

    #[test]
    fn test_detail_pricing() {
        let detail: ProductDetail = serde_json::from_value(detail_json()).unwrap();
        let pricing = detail.pricing();
        assert!(pricing.has_discount());
        assert_eq!(pricing.sale_price().amount, dec!(75));
        assert_eq!(pricing.savings().amount, dec!(25));
    }

    #[test]
    fn test_detail_new_item_tag() {
        let mut detail: ProductDetail = serde_json::from_value(detail_json()).unwrap();
        let now = Utc::now();
        detail.created_at = now - Duration::days(3);
        assert!(detail.is_new_item(now));
        detail.created_at = now - Duration::days(10);
        assert!(!detail.is_new_item(now));
    }

    #[test]
    fn test_stock_size_parsing() {
        let row: ProductStock = serde_json::from_value(serde_json::json!({
            "id": "8d7f6e5d-4c3b-4a29-8170-6f5e4d3c2b1a",
            "product_color_id": "1a2b3c4d-5e6f-4a1b-8c2d-3e4f5a6b7c8d",
            "size": "2XL",
            "stock": -1
        }))
        .unwrap();
        assert_eq!(row.size(), Some(Size::DoubleExtraLarge));
        assert_eq!(row.stock, -1);
    }
}
