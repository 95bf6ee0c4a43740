//! Wishlist.
//!
//! A wishlist row pins a product and, optionally, a color and a size (stock
//! row). Membership is exact: a missing color or size only matches rows
//! stored without one.

mod toggle;

pub use toggle::WishlistToggle;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use liftfit_core::{ColorId, Pricing, ProductId, StockId, UserId, WishlistId};

use crate::backend::{BackendError, null_as_default};
use crate::catalog::pricing_from_row;
use crate::services::auth::Session;

/// Identity of one wishlist membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WishlistKey {
    pub user: UserId,
    pub product: ProductId,
    pub color: Option<ColorId>,
    pub stock: Option<StockId>,
}

/// Errors from wishlist operations.
#[derive(Debug, Error)]
pub enum WishlistError {
    /// Toggle was called before any variant was synced.
    #[error("no product selected")]
    NoSelection,

    /// The key belongs to a different user than the session.
    #[error("wishlist key does not belong to the signed-in user")]
    WrongUser,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Remote wishlist rows.
#[async_trait]
pub trait WishlistStore: Send + Sync {
    /// The row matching `key` exactly, if any.
    async fn find(
        &self,
        session: &Session,
        key: &WishlistKey,
    ) -> Result<Option<WishlistId>, BackendError>;

    /// Insert a row for `key` and return its ID.
    async fn insert(&self, session: &Session, key: &WishlistKey)
    -> Result<WishlistId, BackendError>;

    async fn delete(&self, session: &Session, id: WishlistId) -> Result<(), BackendError>;

    /// The user's rows with product, color and stock joined, highest stock first.
    async fn entries(&self, session: &Session) -> Result<Vec<WishlistEntry>, BackendError>;
}

/// Product columns joined into a wishlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WishlistProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub discount: Option<Decimal>,
}

/// Color columns joined into a wishlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WishlistColor {
    pub color: String,
    #[serde(default)]
    pub hex: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_urls: Vec<String>,
}

/// Stock columns joined into a wishlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WishlistStock {
    pub size: String,
    pub stock: i32,
}

/// A row in `wishlist` with its joins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WishlistEntry {
    pub id: WishlistId,
    pub profile_id: UserId,
    pub product_id: ProductId,
    #[serde(default)]
    pub product_color_id: Option<ColorId>,
    #[serde(default)]
    pub product_stock_id: Option<StockId>,
    #[serde(default, rename = "products")]
    pub product: Option<WishlistProduct>,
    #[serde(default, rename = "product_colors")]
    pub color: Option<WishlistColor>,
    #[serde(default, rename = "product_stocks")]
    pub stock: Option<WishlistStock>,
}

impl WishlistEntry {
    /// Columns and joins requested for the wishlist screen.
    pub const SELECT_COLUMNS: &'static str = "*,products(*),product_colors(*),product_stocks(*)";

    #[must_use]
    pub fn pricing(&self) -> Option<Pricing> {
        self.product
            .as_ref()
            .map(|p| pricing_from_row(p.price, p.discount))
    }
}

/// The wishlist screen.
#[derive(Debug, Clone, Default)]
pub struct WishlistScreen {
    entries: Vec<WishlistEntry>,
}

impl WishlistScreen {
    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Refetch the list. On failure the previous list is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the wishlist cannot be fetched.
    #[instrument(skip_all, fields(user_id = %session.user_id()))]
    pub async fn reload<W: WishlistStore>(
        &mut self,
        store: &W,
        session: &Session,
    ) -> Result<(), BackendError> {
        self.entries = store
            .entries(session)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error fetching wishlist"))?;
        Ok(())
    }

    /// Remove an entry, then reload the list.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete or the reload fails.
    #[instrument(skip_all, fields(wishlist_id = %id))]
    pub async fn remove<W: WishlistStore>(
        &mut self,
        store: &W,
        session: &Session,
        id: WishlistId,
    ) -> Result<(), BackendError> {
        store
            .delete(session, id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error deleting wishlist entry"))?;
        self.reload(store, session).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entry_with_joins() {
        let entry: WishlistEntry = serde_json::from_value(serde_json::json!({
            "id": "9a8b7c6d-5e4f-4a3b-9c2d-1e0f9a8b7c6d",
            "profile_id": "6f1c2b1e-8a4d-4c1b-9a57-0d2f1f6b8e11",
            "product_id": "0b8f9c3e-6a9e-4b55-a1e2-0c6d1b7a2f10",
            "product_color_id": "1a2b3c4d-5e6f-4a1b-8c2d-3e4f5a6b7c8d",
            "product_stock_id": null,
            "products": { "id": "0b8f9c3e-6a9e-4b55-a1e2-0c6d1b7a2f10", "name": "Pump Cover", "price": 40, "discount": 0.5 },
            "product_colors": { "color": "Sage", "hex": "#9caf88", "image_urls": null },
            "product_stocks": null
        }))
        .unwrap();

        assert_eq!(entry.product_stock_id, None);
        assert!(entry.stock.is_none());
        assert!(entry.color.as_ref().unwrap().image_urls.is_empty());
        assert_eq!(entry.pricing().unwrap().sale_price().amount, dec!(20));
    }
}
