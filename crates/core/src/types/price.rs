//! Type-safe price and discount representation using decimal arithmetic.
//!
//! Products carry a base price and an optional discount fraction. The
//! storefront shows a sale price and the savings whenever the discount is
//! non-zero; a zero or missing discount suppresses all discount UI.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a USD price.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{}{rounded:.2}", self.currency_code.symbol())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes the store sells in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD => "$",
        }
    }
}

/// Errors that can occur when constructing a [`Discount`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscountError {
    /// The fraction is negative.
    #[error("discount cannot be negative (got {0})")]
    Negative(Decimal),
    /// The fraction would make the item free or cost less than nothing.
    #[error("discount must be below 1 (got {0})")]
    TooLarge(Decimal),
}

/// A discount expressed as a fraction of the base price (`0.25` = 25% off).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Discount(Decimal);

impl Discount {
    /// Create a discount from a fraction in `[0, 1)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the fraction is negative or at least 1.
    pub fn new(fraction: Decimal) -> Result<Self, DiscountError> {
        if fraction.is_sign_negative() && !fraction.is_zero() {
            return Err(DiscountError::Negative(fraction));
        }
        if fraction >= Decimal::ONE {
            return Err(DiscountError::TooLarge(fraction));
        }
        Ok(Self(fraction))
    }

    /// The discount fraction.
    #[must_use]
    pub const fn fraction(self) -> Decimal {
        self.0
    }

    /// Whether this discount actually reduces the price.
    #[must_use]
    pub fn is_active(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Whole percentage for badges (e.g., `0.25` → `25`).
    #[must_use]
    pub fn percent(self) -> Decimal {
        (self.0 * Decimal::ONE_HUNDRED).round_dp(0)
    }
}

impl TryFrom<Decimal> for Discount {
    type Error = DiscountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Discount> for Decimal {
    fn from(discount: Discount) -> Self {
        discount.0
    }
}

/// Base price plus optional discount, with derived sale figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    base: Price,
    discount: Option<Discount>,
}

impl Pricing {
    /// Create pricing from a base price and an optional discount.
    #[must_use]
    pub const fn new(base: Price, discount: Option<Discount>) -> Self {
        Self { base, discount }
    }

    /// The undiscounted price.
    #[must_use]
    pub const fn base(&self) -> Price {
        self.base
    }

    /// The discount, only when it actually reduces the price.
    #[must_use]
    pub fn active_discount(&self) -> Option<Discount> {
        self.discount.filter(|d| d.is_active())
    }

    /// Whether any discount UI should be shown.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.active_discount().is_some()
    }

    /// Price the customer pays: `price × (1 − discount)`.
    #[must_use]
    pub fn sale_price(&self) -> Price {
        let fraction = self.active_discount().map_or(Decimal::ZERO, Discount::fraction);
        Price::new(
            self.base.amount - self.base.amount * fraction,
            self.base.currency_code,
        )
    }

    /// Amount saved relative to the base price.
    #[must_use]
    pub fn savings(&self) -> Price {
        Price::new(
            self.base.amount - self.sale_price().amount,
            self.base.currency_code,
        )
    }

    /// Price to display as the headline price.
    #[must_use]
    pub fn display_price(&self) -> Price {
        self.sale_price()
    }
}
