//! Wishlist heart button state.

use tracing::instrument;

use liftfit_core::WishlistId;

use crate::error::add_breadcrumb;
use crate::services::auth::Session;

use super::{WishlistError, WishlistKey, WishlistStore};

/// Membership of the currently shown variant.
///
/// The local flag only changes after the remote call succeeds. Each key has
/// its own membership; switching keys never carries the flag over.
#[derive(Debug, Clone, Default)]
pub struct WishlistToggle {
    key: Option<WishlistKey>,
    row: Option<WishlistId>,
    loaded: bool,
}

impl WishlistToggle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the current variant is wishlisted.
    #[must_use]
    pub const fn is_wishlisted(&self) -> bool {
        self.row.is_some()
    }

    /// Whether membership for the current key has been looked up.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub const fn key(&self) -> Option<&WishlistKey> {
        self.key.as_ref()
    }

    /// Point the toggle at `key`, looking up membership when the key changed
    /// or was never loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails; the toggle then shows "not
    /// wishlisted" for the new key.
    #[instrument(skip_all, fields(product_id = %key.product))]
    pub async fn sync<W: WishlistStore>(
        &mut self,
        store: &W,
        session: &Session,
        key: WishlistKey,
    ) -> Result<(), WishlistError> {
        if self.loaded && self.key == Some(key) {
            return Ok(());
        }
        check_owner(session, &key)?;

        self.key = Some(key);
        self.row = None;
        self.loaded = false;

        let row = store
            .find(session, &key)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error checking wishlist"))?;
        self.row = row;
        self.loaded = true;
        Ok(())
    }

    /// Add or remove the current variant.
    ///
    /// When the last lookup failed, membership is looked up again first so
    /// an existing row is never inserted twice.
    ///
    /// Returns the new membership.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::NoSelection` before the first sync, or the
    /// backend error if the lookup, insert or delete fails (state unchanged).
    #[instrument(skip_all)]
    pub async fn toggle<W: WishlistStore>(
        &mut self,
        store: &W,
        session: &Session,
    ) -> Result<bool, WishlistError> {
        let key = self.key.ok_or(WishlistError::NoSelection)?;
        check_owner(session, &key)?;
        let product = key.product.to_string();

        if !self.loaded {
            self.row = store
                .find(session, &key)
                .await
                .inspect_err(|e| tracing::error!(error = %e, "Error checking wishlist"))?;
            self.loaded = true;
        }

        if let Some(id) = self.row {
            store
                .delete(session, id)
                .await
                .inspect_err(|e| tracing::error!(error = %e, "Error removing from wishlist"))?;
            self.row = None;
            add_breadcrumb(
                "wishlist",
                "Removed from wishlist",
                Some(&[("product_id", product.as_str())]),
            );
        } else {
            let id = store
                .insert(session, &key)
                .await
                .inspect_err(|e| tracing::error!(error = %e, "Error adding to wishlist"))?;
            self.row = Some(id);
            add_breadcrumb(
                "wishlist",
                "Added to wishlist",
                Some(&[("product_id", product.as_str())]),
            );
        }

        Ok(self.is_wishlisted())
    }
}

fn check_owner(session: &Session, key: &WishlistKey) -> Result<(), WishlistError> {
    if session.user_id() == key.user {
        Ok(())
    } else {
        Err(WishlistError::WrongUser)
    }
}
