//! Product catalog: rows, lookup tables and the screens built on them.
//!
//! # Modules
//!
//! - `filters` - Active and staged filter selections, sort order, navigation seeds
//! - `query` - Composes a filter selection and page into a row query
//! - `pager` - Incremental loading with stale-response protection
//! - `shop` - Shop screen orchestration
//! - `browse` - Category sections with sampled products
//! - `home` - News carousel and categories

pub mod browse;
pub mod filters;
pub mod home;
pub mod pager;
pub mod query;
pub mod shop;

pub use browse::{
    BrowseScreen, BrowseSection, BrowseShortcut, SECTION_SAMPLE_SIZE, SHORTCUTS, TypeLink,
    build_sections,
};
pub use filters::{FilterSet, NavigationSeed, SortOrder, StagedFilters, UnknownSortOrder};
pub use home::{HomeScreen, NEWS_LIMIT};
pub use pager::{CatalogPager, PageOutcome, PageTicket};
pub use query::ProductQuery;
pub use shop::ShopScreen;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use liftfit_core::{
    CategoryId, ColorId, Discount, Gender, NewsId, Price, Pricing, ProductId, StyleId, TypeId,
};

use crate::backend::{BackendError, null_as_default};
use crate::product::{ProductColor, ProductDetail, ProductStock};
use crate::reviews::Review;

/// Products created less than this many days ago carry a "new" tag.
pub const NEW_ITEM_WINDOW_DAYS: i64 = 7;

/// Whether a product created at `created_at` is new at `now`.
#[must_use]
pub fn is_new_item(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - created_at < Duration::days(NEW_ITEM_WINDOW_DAYS)
}

/// A row in `products` as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    /// Raw discount fraction; rows outside `[0, 1)` are treated as no discount.
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
}

impl ProductSummary {
    /// Base price with the row's discount applied.
    #[must_use]
    pub fn pricing(&self) -> Pricing {
        pricing_from_row(self.price, self.discount)
    }

    /// First image, used for cards.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }

    /// Whether the product carries the "new" tag at `now`.
    #[must_use]
    pub fn is_new_item(&self, now: DateTime<Utc>) -> bool {
        is_new_item(self.created_at, now)
    }
}

/// Build [`Pricing`] from a row's raw price and discount columns.
pub(crate) fn pricing_from_row(price: Decimal, discount: Option<Decimal>) -> Pricing {
    let discount = discount.and_then(|fraction| match Discount::new(fraction) {
        Ok(d) => Some(d),
        Err(e) => {
            tracing::warn!(%fraction, error = %e, "Ignoring out-of-range discount");
            None
        }
    });
    Pricing::new(Price::usd(price), discount)
}

/// A row in `product_categories`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A row in `product_types`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductType {
    pub id: TypeId,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

/// A row in `product_styles`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Style {
    pub id: StyleId,
    pub name: String,
}

/// A row in `news`, shown in the home carousel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewsPost {
    pub id: NewsId,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub background_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Read access to catalog rows.
///
/// Implemented by [`crate::backend::BackendClient`]; tests substitute an
/// in-memory store.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// One page of products matching a query.
    async fn products(&self, query: &ProductQuery) -> Result<Vec<ProductSummary>, BackendError>;

    /// Every product, unpaged.
    async fn all_products(&self) -> Result<Vec<ProductSummary>, BackendError>;

    async fn categories(&self) -> Result<Vec<Category>, BackendError>;

    async fn product_types(&self) -> Result<Vec<ProductType>, BackendError>;

    async fn styles(&self) -> Result<Vec<Style>, BackendError>;

    /// A product with its category, type and style names. Missing is `Ok(None)`.
    async fn product(&self, id: ProductId) -> Result<Option<ProductDetail>, BackendError>;

    /// Colors offered for a product, in backend order.
    async fn colors(&self, product: ProductId) -> Result<Vec<ProductColor>, BackendError>;

    /// Stock rows for the given colors.
    async fn stocks(&self, colors: &[ColorId]) -> Result<Vec<ProductStock>, BackendError>;

    /// Highest-rated reviews for a product, best first.
    async fn top_reviews(
        &self,
        product: ProductId,
        limit: u32,
    ) -> Result<Vec<Review>, BackendError>;

    /// Most recent news posts, newest first.
    async fn latest_news(&self, limit: u32) -> Result<Vec<NewsPost>, BackendError>;
}
