//! Stock levels and the availability shown to shoppers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Stock known for a (color, size) combination.
///
/// `Unknown` means the backend has no stock row for the combination. It is
/// kept apart from an explicit `Quantity(0)` so callers can tell "never
/// stocked" from "sold out".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StockLevel {
    #[default]
    Unknown,
    /// Units on hand. May be negative when inventory tracking overshoots.
    Quantity(i32),
}

impl StockLevel {
    /// Units available to purchase, treating unknown and negative as zero.
    #[must_use]
    pub fn purchasable_units(self) -> u32 {
        match self {
            Self::Unknown => 0,
            Self::Quantity(n) => u32::try_from(n).unwrap_or(0),
        }
    }

    /// Whether at least one unit can be bought.
    #[must_use]
    pub fn is_purchasable(self) -> bool {
        self.purchasable_units() > 0
    }

    /// Classify this level for display.
    #[must_use]
    pub const fn availability(self) -> Availability {
        match self {
            Self::Unknown => Availability::Unknown,
            Self::Quantity(n) if n > Availability::LOW_STOCK_THRESHOLD => Availability::InStock,
            Self::Quantity(n) if n > 0 => Availability::OnlyLeft(n.unsigned_abs()),
            Self::Quantity(_) => Availability::OutOfStock,
        }
    }
}

/// Display classification of a stock level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Availability {
    /// More than [`Availability::LOW_STOCK_THRESHOLD`] units.
    InStock,
    /// Between 1 and the threshold units.
    OnlyLeft(u32),
    /// Zero or negative units on record.
    OutOfStock,
    /// No stock row exists for the combination.
    Unknown,
}

impl Availability {
    /// Quantities at or below this (and above zero) show a scarcity message.
    pub const LOW_STOCK_THRESHOLD: i32 = 3;

    /// Shopper-facing label.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::InStock => "In Stock".to_string(),
            Self::OnlyLeft(n) => format!("Only {n} left!"),
            Self::OutOfStock | Self::Unknown => "Out of stock".to_string(),
        }
    }

    /// Whether the label should be highlighted as a warning.
    #[must_use]
    pub const fn is_warning(self) -> bool {
        !matches!(self, Self::InStock)
    }

    /// Whether add-to-cart is allowed.
    #[must_use]
    pub const fn can_purchase(self) -> bool {
        matches!(self, Self::InStock | Self::OnlyLeft(_))
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_labels() {
        assert_eq!(StockLevel::Quantity(5).availability().label(), "In Stock");
        assert_eq!(StockLevel::Quantity(2).availability().label(), "Only 2 left!");
        assert_eq!(StockLevel::Quantity(0).availability().label(), "Out of stock");
    }

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(StockLevel::Quantity(4).availability(), Availability::InStock);
        assert_eq!(StockLevel::Quantity(3).availability(), Availability::OnlyLeft(3));
        assert_eq!(StockLevel::Quantity(1).availability(), Availability::OnlyLeft(1));
    }

    #[test]
    fn test_negative_stock_is_out_of_stock() {
        assert_eq!(StockLevel::Quantity(-2).availability(), Availability::OutOfStock);
        assert_eq!(StockLevel::Quantity(-2).purchasable_units(), 0);
    }

    #[test]
    fn test_unknown_is_distinct_from_zero() {
        assert_eq!(StockLevel::Unknown.availability(), Availability::Unknown);
        assert_ne!(StockLevel::Unknown, StockLevel::Quantity(0));
        assert_eq!(StockLevel::Unknown.availability().label(), "Out of stock");
    }

    #[test]
    fn test_purchase_allowed_only_with_positive_stock() {
        assert!(StockLevel::Quantity(5).availability().can_purchase());
        assert!(StockLevel::Quantity(2).availability().can_purchase());
        assert!(!StockLevel::Quantity(0).availability().can_purchase());
        assert!(!StockLevel::Unknown.availability().can_purchase());
    }
}
