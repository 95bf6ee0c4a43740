//! Card presentation.
//!
//! Product cards appear in grids, horizontal carousels and browse rows. All
//! of them come from one mapping, [`ProductCard::from_product`], with the
//! context expressed as a [`CardLayout`].

use liftfit_core::{ProductId, StockLevel, WishlistId};

use crate::catalog::ProductSummary;
use crate::wishlist::WishlistEntry;

/// Size and spacing of a card in its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLayout {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
}

impl CardLayout {
    /// Card in a horizontal carousel: 60% of the screen wide.
    #[must_use]
    pub const fn carousel(screen_width: u32) -> Self {
        Self {
            width: screen_width * 3 / 5,
            height: 300,
            margin: 0,
        }
    }

    /// Card in a browse-screen category row.
    #[must_use]
    pub const fn browse_row() -> Self {
        Self {
            width: 300,
            height: 200,
            margin: 0,
        }
    }

    /// Card in a grid of `columns` equal columns.
    #[must_use]
    pub fn grid(screen_width: u32, columns: u32, margin: u32) -> Self {
        let columns = columns.max(1);
        let width = (screen_width / columns).saturating_sub(margin * 2);
        Self {
            width,
            height: width * 3 / 2,
            margin,
        }
    }

    /// Scroll distance between consecutive cards.
    #[must_use]
    pub const fn snap_interval(&self) -> u32 {
        self.width + self.margin
    }
}

/// A product as a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub product_id: ProductId,
    pub title: String,
    pub image_url: Option<String>,
    /// Price the shopper pays.
    pub price: String,
    /// Struck-through original price, only when discounted.
    pub original_price: Option<String>,
    /// Whether to show the sale tag.
    pub on_sale: bool,
    pub layout: CardLayout,
}

impl ProductCard {
    #[must_use]
    pub fn from_product(product: &ProductSummary, layout: CardLayout) -> Self {
        let pricing = product.pricing();
        let on_sale = pricing.has_discount();
        Self {
            product_id: product.id,
            title: product.name.clone(),
            image_url: product.primary_image().map(str::to_string),
            price: pricing.display_price().display(),
            original_price: on_sale.then(|| pricing.base().display()),
            on_sale,
            layout,
        }
    }
}

/// A wishlist entry as a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistCard {
    pub id: WishlistId,
    pub product_id: ProductId,
    pub title: String,
    /// First image of the wishlisted color.
    pub image_url: Option<String>,
    /// "Color, Size", or whichever half is known.
    pub variant: Option<String>,
    pub price: String,
    pub original_price: Option<String>,
    pub stock: StockLevel,
    /// Dimmed when the pinned size has no stock left.
    pub out_of_stock: bool,
}

impl WishlistCard {
    #[must_use]
    pub fn from_entry(entry: &WishlistEntry) -> Self {
        let pricing = entry.pricing();
        let on_sale = pricing.is_some_and(|p| p.has_discount());

        let color = entry.color.as_ref().map(|c| c.color.as_str());
        let size = entry.stock.as_ref().map(|s| s.size.as_str());
        let variant = match (color, size) {
            (Some(c), Some(s)) => Some(format!("{c}, {s}")),
            (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
            (None, None) => None,
        };

        let stock = entry
            .stock
            .as_ref()
            .map_or(StockLevel::Unknown, |s| StockLevel::Quantity(s.stock));

        Self {
            id: entry.id,
            product_id: entry.product_id,
            title: entry
                .product
                .as_ref()
                .map_or_else(String::new, |p| p.name.clone()),
            image_url: entry
                .color
                .as_ref()
                .and_then(|c| c.image_urls.first().cloned()),
            variant,
            price: pricing.map_or_else(String::new, |p| p.display_price().display()),
            original_price: pricing.filter(|_| on_sale).map(|p| p.base().display()),
            stock,
            out_of_stock: matches!(stock, StockLevel::Quantity(n) if n <= 0),
        }
    }
}
