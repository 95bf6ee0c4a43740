//! Catalog reads.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use liftfit_core::{ColorId, ProductId};

use crate::catalog::{
    CatalogSource, Category, NewsPost, ProductQuery, ProductSummary, ProductType, Style,
};
use crate::product::{ProductColor, ProductDetail, ProductStock};
use crate::reviews::{REVIEW_COLUMNS, Review};

use super::cache::{CacheKey, CacheValue};
use super::{BackendClient, BackendError, Direction, Filter, Select};

#[async_trait]
impl CatalogSource for BackendClient {
    #[instrument(skip_all, fields(page = query.page))]
    async fn products(&self, query: &ProductQuery) -> Result<Vec<ProductSummary>, BackendError> {
        self.select(&query.to_select(), None).await
    }

    #[instrument(skip_all)]
    async fn all_products(&self) -> Result<Vec<ProductSummary>, BackendError> {
        self.select(&Select::from("products"), None).await
    }

    #[instrument(skip_all)]
    async fn categories(&self) -> Result<Vec<Category>, BackendError> {
        if let Some(CacheValue::Categories(rows)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(rows.as_ref().clone());
        }

        let rows: Vec<Category> = self
            .select(&Select::from("product_categories"), None)
            .await?;
        self.inner
            .cache
            .insert(CacheKey::Categories, CacheValue::Categories(Arc::new(rows.clone())))
            .await;
        Ok(rows)
    }

    #[instrument(skip_all)]
    async fn product_types(&self) -> Result<Vec<ProductType>, BackendError> {
        if let Some(CacheValue::ProductTypes(rows)) =
            self.inner.cache.get(&CacheKey::ProductTypes).await
        {
            debug!("Cache hit for product types");
            return Ok(rows.as_ref().clone());
        }

        let rows: Vec<ProductType> = self.select(&Select::from("product_types"), None).await?;
        self.inner
            .cache
            .insert(
                CacheKey::ProductTypes,
                CacheValue::ProductTypes(Arc::new(rows.clone())),
            )
            .await;
        Ok(rows)
    }

    #[instrument(skip_all)]
    async fn styles(&self) -> Result<Vec<Style>, BackendError> {
        if let Some(CacheValue::Styles(rows)) = self.inner.cache.get(&CacheKey::Styles).await {
            debug!("Cache hit for styles");
            return Ok(rows.as_ref().clone());
        }

        let rows: Vec<Style> = self.select(&Select::from("product_styles"), None).await?;
        self.inner
            .cache
            .insert(CacheKey::Styles, CacheValue::Styles(Arc::new(rows.clone())))
            .await;
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn product(&self, id: ProductId) -> Result<Option<ProductDetail>, BackendError> {
        let query = Select::from("products")
            .columns(ProductDetail::SELECT_COLUMNS)
            .filter(Filter::eq("id", id));
        self.select_one(&query, None).await
    }

    #[instrument(skip(self))]
    async fn colors(&self, product: ProductId) -> Result<Vec<ProductColor>, BackendError> {
        let query = Select::from("product_colors").filter(Filter::eq("product_id", product));
        self.select(&query, None).await
    }

    #[instrument(skip_all, fields(colors = colors.len()))]
    async fn stocks(&self, colors: &[ColorId]) -> Result<Vec<ProductStock>, BackendError> {
        if colors.is_empty() {
            return Ok(Vec::new());
        }
        let query = Select::from("product_stocks")
            .filter(Filter::in_list("product_color_id", colors.iter()));
        self.select(&query, None).await
    }

    #[instrument(skip(self))]
    async fn top_reviews(
        &self,
        product: ProductId,
        limit: u32,
    ) -> Result<Vec<Review>, BackendError> {
        let query = Select::from("reviews")
            .columns(REVIEW_COLUMNS)
            .filter(Filter::eq("product_id", product))
            .order("rating", Direction::Descending)
            .order("created_at", Direction::Descending)
            .limit(limit);
        self.select(&query, None).await
    }

    #[instrument(skip(self))]
    async fn latest_news(&self, limit: u32) -> Result<Vec<NewsPost>, BackendError> {
        let query = Select::from("news")
            .order("created_at", Direction::Descending)
            .limit(limit);
        self.select(&query, None).await
    }
}
