//! Wishlist rows.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use liftfit_core::{ColorId, ProductId, StockId, UserId, WishlistId};

use crate::services::auth::Session;
use crate::wishlist::{WishlistEntry, WishlistKey, WishlistStore};

use super::{BackendClient, BackendError, Direction, Filter, Select};

const TABLE: &str = "wishlist";

/// Insert body for a wishlist row.
#[derive(Debug, Serialize)]
struct NewWishlistRow {
    profile_id: UserId,
    product_id: ProductId,
    product_color_id: Option<ColorId>,
    product_stock_id: Option<StockId>,
}

impl From<&WishlistKey> for NewWishlistRow {
    fn from(key: &WishlistKey) -> Self {
        Self {
            profile_id: key.user,
            product_id: key.product,
            product_color_id: key.color,
            product_stock_id: key.stock,
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: WishlistId,
}

#[async_trait]
impl WishlistStore for BackendClient {
    #[instrument(skip_all, fields(product_id = %key.product))]
    async fn find(
        &self,
        session: &Session,
        key: &WishlistKey,
    ) -> Result<Option<WishlistId>, BackendError> {
        let query = Select::from(TABLE)
            .columns("id")
            .filter(Filter::eq("profile_id", key.user))
            .filter(Filter::eq("product_id", key.product))
            .filter(Filter::eq_or_null("product_color_id", key.color))
            .filter(Filter::eq_or_null("product_stock_id", key.stock));
        let row: Option<IdRow> = self.select_one(&query, Some(session)).await?;
        Ok(row.map(|r| r.id))
    }

    #[instrument(skip_all, fields(product_id = %key.product))]
    async fn insert(
        &self,
        session: &Session,
        key: &WishlistKey,
    ) -> Result<WishlistId, BackendError> {
        let inserted: Result<IdRow, _> =
            BackendClient::insert(self, TABLE, &NewWishlistRow::from(key), Some(session)).await;
        match inserted {
            Ok(row) => Ok(row.id),
            // Another device added the same variant first; adopt its row.
            Err(err) if err.is_conflict() => {
                tracing::debug!("Wishlist row already exists");
                self.find(session, key).await?.ok_or(err)
            }
            Err(err) => Err(err),
        }
    }

    #[instrument(skip(self, session))]
    async fn delete(&self, session: &Session, id: WishlistId) -> Result<(), BackendError> {
        BackendClient::delete(self, TABLE, &[Filter::eq("id", id)], Some(session)).await
    }

    #[instrument(skip_all, fields(user_id = %session.user_id()))]
    async fn entries(&self, session: &Session) -> Result<Vec<WishlistEntry>, BackendError> {
        let query = Select::from(TABLE)
            .columns(WishlistEntry::SELECT_COLUMNS)
            .filter(Filter::eq("profile_id", session.user_id()))
            .order("product_stocks(stock)", Direction::Descending);
        self.select(&query, Some(session)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_body_keeps_absent_variant_as_null() {
        let key = WishlistKey {
            user: UserId::random(),
            product: ProductId::random(),
            color: None,
            stock: None,
        };
        let body = serde_json::to_value(NewWishlistRow::from(&key)).unwrap_or_default();
        assert!(body["product_color_id"].is_null());
        assert!(body["product_stock_id"].is_null());
        assert_eq!(body["product_id"], key.product.to_string());
    }
}
