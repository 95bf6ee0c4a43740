//! Gender tag used as a catalog facet.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Gender a product is cut for.
///
/// Stored in the backend as the strings `"Men"`, `"Women"` and `"Unisex"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    Men,
    Women,
    #[serde(other)]
    Unisex,
}

impl Gender {
    /// The value stored in the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Men => "Men",
            Self::Women => "Women",
            Self::Unisex => "Unisex",
        }
    }

    /// Parse a navigation parameter or facet label, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "men" | "male" => Some(Self::Men),
            "women" | "female" => Some(Self::Women),
            "unisex" => Some(Self::Unisex),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
