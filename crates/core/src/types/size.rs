//! Garment sizes.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A garment size, ordered smallest to largest.
///
/// Size selectors always render the full range in this order, whether or not
/// the backend has a stock row for every size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Size {
    #[serde(rename = "XS")]
    ExtraSmall,
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Large,
    #[serde(rename = "XL")]
    ExtraLarge,
    #[serde(rename = "2XL")]
    DoubleExtraLarge,
    #[serde(rename = "3XL")]
    TripleExtraLarge,
}

impl Size {
    /// Every size, in display order.
    pub const ALL: [Self; 7] = [
        Self::ExtraSmall,
        Self::Small,
        Self::Medium,
        Self::Large,
        Self::ExtraLarge,
        Self::DoubleExtraLarge,
        Self::TripleExtraLarge,
    ];

    /// Size selected when a product page opens.
    pub const DEFAULT: Self = Self::Medium;

    /// The label stored in the backend (`"XS"`, `"2XL"`, ...).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ExtraSmall => "XS",
            Self::Small => "S",
            Self::Medium => "M",
            Self::Large => "L",
            Self::ExtraLarge => "XL",
            Self::DoubleExtraLarge => "2XL",
            Self::TripleExtraLarge => "3XL",
        }
    }

    /// Parse a backend label. Unknown labels yield `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|size| size.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
