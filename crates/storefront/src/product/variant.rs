//! Color and size selection on the product page.

use liftfit_core::{Availability, ColorId, ProductId, Size, StockId, StockLevel, UserId};

use crate::wishlist::WishlistKey;

use super::{ProductColor, ProductStock};

/// One entry in the size selector for the selected color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeSlot {
    pub size: Size,
    pub stock: StockLevel,
    /// Backend stock row, when one exists for this (color, size).
    pub stock_id: Option<StockId>,
}

impl SizeSlot {
    #[must_use]
    pub const fn availability(&self) -> Availability {
        self.stock.availability()
    }

    /// Whether the size button should be enabled.
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        self.stock.is_purchasable()
    }
}

/// The selected (color, size) pair and the stock data behind it.
///
/// The first color is selected on load and the size starts at
/// [`Size::DEFAULT`]. Switching colors keeps the size, whether or not the
/// new color stocks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSelection {
    colors: Vec<ProductColor>,
    stocks: Vec<ProductStock>,
    color: Option<ColorId>,
    size: Size,
}

impl VariantSelection {
    #[must_use]
    pub fn new(colors: Vec<ProductColor>, stocks: Vec<ProductStock>) -> Self {
        let color = colors.first().map(|c| c.id);
        Self {
            colors,
            stocks,
            color,
            size: Size::DEFAULT,
        }
    }

    #[must_use]
    pub fn colors(&self) -> &[ProductColor] {
        &self.colors
    }

    #[must_use]
    pub fn selected_color(&self) -> Option<&ProductColor> {
        let id = self.color?;
        self.colors.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub const fn selected_size(&self) -> Size {
        self.size
    }

    /// Select a color. Returns `false` (and changes nothing) if the product
    /// has no such color.
    pub fn select_color(&mut self, id: ColorId) -> bool {
        if self.colors.iter().any(|c| c.id == id) {
            self.color = Some(id);
            true
        } else {
            false
        }
    }

    pub const fn select_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Every size for the selected color, smallest first.
    #[must_use]
    pub fn size_slots(&self) -> Vec<SizeSlot> {
        Size::ALL.into_iter().map(|size| self.slot(size)).collect()
    }

    /// The slot for the selected size.
    #[must_use]
    pub fn current_slot(&self) -> SizeSlot {
        self.slot(self.size)
    }

    #[must_use]
    pub fn availability(&self) -> Availability {
        self.current_slot().availability()
    }

    /// Add-to-cart is enabled only for a positive stock count.
    #[must_use]
    pub fn can_add_to_cart(&self) -> bool {
        self.current_slot().is_purchasable()
    }

    /// "Color, Size" line shown in the stock panel.
    #[must_use]
    pub fn selection_label(&self) -> Option<String> {
        self.selected_color()
            .map(|color| format!("{}, {}", color.color, self.size))
    }

    /// Wishlist key for the current selection.
    #[must_use]
    pub fn wishlist_key(&self, user: UserId, product: ProductId) -> WishlistKey {
        WishlistKey {
            user,
            product,
            color: self.color,
            stock: self.current_slot().stock_id,
        }
    }

    fn slot(&self, size: Size) -> SizeSlot {
        let row = self.color.and_then(|color| {
            self.stocks
                .iter()
                .find(|s| s.product_color_id == color && s.size() == Some(size))
        });
        row.map_or(
            SizeSlot {
                size,
                stock: StockLevel::Unknown,
                stock_id: None,
            },
            |row| SizeSlot {
                size,
                stock: StockLevel::Quantity(row.stock),
                stock_id: Some(row.id),
            },
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn color(name: &str) -> ProductColor {
        ProductColor {
            id: ColorId::random(),
            product_id: ProductId::random(),
            color: name.to_string(),
            hex: "#000000".to_string(),
            image_urls: vec![],
        }
    }

    fn stock(color: &ProductColor, size: &str, stock: i32) -> ProductStock {
        ProductStock {
            id: StockId::random(),
            product_color_id: color.id,
            size: size.to_string(),
            stock,
        }
    }

    #[test]
    fn test_defaults_to_first_color_and_medium() {
        let black = color("Black");
        let white = color("White");
        let m = stock(&black, "M", 12);
        let selection =
            VariantSelection::new(vec![black.clone(), white], vec![m.clone()]);

        assert_eq!(selection.selected_color().unwrap().id, black.id);
        assert_eq!(selection.selected_size(), Size::Medium);
        assert_eq!(selection.current_slot().stock_id, Some(m.id));
        assert_eq!(selection.selection_label().unwrap(), "Black, M");
    }

    #[test]
    fn test_missing_default_size_is_unknown_not_zero() {
        let black = color("Black");
        let selection = VariantSelection::new(vec![black.clone()], vec![stock(&black, "L", 4)]);

        let slot = selection.current_slot();
        assert_eq!(slot.stock, StockLevel::Unknown);
        assert_eq!(slot.stock_id, None);
        assert_eq!(selection.availability(), Availability::Unknown);
        assert_eq!(selection.availability().label(), "Out of stock");
        assert!(!selection.can_add_to_cart());
    }

    #[test]
    fn test_sizes_render_in_fixed_order() {
        let black = color("Black");
        let stocks = vec![
            stock(&black, "XL", 1),
            stock(&black, "XS", 9),
            stock(&black, "2XL", 0),
        ];
        let selection = VariantSelection::new(vec![black], stocks);
        let slots = selection.size_slots();

        let labels: Vec<_> = slots.iter().map(|s| s.size.label()).collect();
        assert_eq!(labels, ["XS", "S", "M", "L", "XL", "2XL", "3XL"]);
        assert_eq!(slots[0].stock, StockLevel::Quantity(9));
        assert_eq!(slots[1].stock, StockLevel::Unknown);
        assert_eq!(slots[4].stock, StockLevel::Quantity(1));
        assert_eq!(slots[5].stock, StockLevel::Quantity(0));
    }

    #[test]
    fn test_color_change_keeps_size() {
        let black = color("Black");
        let white = color("White");
        let stocks = vec![stock(&black, "L", 6), stock(&white, "S", 2)];
        let mut selection = VariantSelection::new(vec![black, white.clone()], stocks);

        selection.select_size(Size::Large);
        assert!(selection.can_add_to_cart());

        assert!(selection.select_color(white.id));
        assert_eq!(selection.selected_size(), Size::Large);
        assert_eq!(selection.current_slot().stock, StockLevel::Unknown);
        assert!(!selection.can_add_to_cart());

        selection.select_size(Size::Small);
        assert_eq!(selection.availability().label(), "Only 2 left!");
    }

    #[test]
    fn test_unknown_color_is_rejected() {
        let black = color("Black");
        let mut selection = VariantSelection::new(vec![black.clone()], vec![]);
        assert!(!selection.select_color(ColorId::random()));
        assert_eq!(selection.selected_color().unwrap().id, black.id);
    }

    #[test]
    fn test_stock_display_states() {
        let black = color("Black");
        for (units, label, purchasable) in [
            (5, "In Stock", true),
            (2, "Only 2 left!", true),
            (0, "Out of stock", false),
            (-3, "Out of stock", false),
        ] {
            let selection =
                VariantSelection::new(vec![black.clone()], vec![stock(&black, "M", units)]);
            assert_eq!(selection.availability().label(), label, "stock {units}");
            assert_eq!(selection.can_add_to_cart(), purchasable, "stock {units}");
        }
    }

    #[test]
    fn test_wishlist_key_uses_real_stock_rows_only() {
        let black = color("Black");
        let m = stock(&black, "M", 3);
        let mut selection = VariantSelection::new(vec![black.clone()], vec![m.clone()]);
        let user = UserId::random();
        let product = ProductId::random();

        let key = selection.wishlist_key(user, product);
        assert_eq!(key.color, Some(black.id));
        assert_eq!(key.stock, Some(m.id));

        selection.select_size(Size::ExtraLarge);
        let key = selection.wishlist_key(user, product);
        assert_eq!(key.color, Some(black.id));
        assert_eq!(key.stock, None);
    }

    #[test]
    fn test_no_colors() {
        let selection = VariantSelection::new(vec![], vec![]);
        assert!(selection.selected_color().is_none());
        assert!(selection.selection_label().is_none());
        assert!(!selection.can_add_to_cart());
    }
}
