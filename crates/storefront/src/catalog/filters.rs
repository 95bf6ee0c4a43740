//! Catalog filter selections.
//!
//! The shop screen holds one active [`FilterSet`]. The filter panel edits a
//! [`StagedFilters`] copy, which only replaces the active set on
//! [`StagedFilters::commit`].

use std::collections::BTreeSet;
use std::str::FromStr;

use liftfit_core::{CategoryId, Gender, StyleId, TypeId};

use crate::backend::Direction;

// =============================================================================
// Sort order
// =============================================================================

/// Closed set of catalog orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    PriceAsc,
    PriceDesc,
    #[default]
    CreatedAsc,
    CreatedDesc,
    NameAsc,
    NameDesc,
}

impl SortOrder {
    /// Every ordering, in the order the panel lists them.
    pub const ALL: [Self; 6] = [
        Self::PriceAsc,
        Self::PriceDesc,
        Self::CreatedAsc,
        Self::CreatedDesc,
        Self::NameAsc,
        Self::NameDesc,
    ];

    /// The column and direction this ordering sorts by.
    #[must_use]
    pub const fn clause(self) -> (&'static str, Direction) {
        match self {
            Self::PriceAsc => ("price", Direction::Ascending),
            Self::PriceDesc => ("price", Direction::Descending),
            Self::CreatedAsc => ("created_at", Direction::Ascending),
            Self::CreatedDesc => ("created_at", Direction::Descending),
            Self::NameAsc => ("name", Direction::Ascending),
            Self::NameDesc => ("name", Direction::Descending),
        }
    }

    /// Label shown in the sort picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::CreatedAsc => "Oldest",
            Self::CreatedDesc => "Newest",
            Self::NameAsc => "Name: A to Z",
            Self::NameDesc => "Name: Z to A",
        }
    }

    /// Short machine name, e.g. `price-asc`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::CreatedAsc => "created-asc",
            Self::CreatedDesc => "created-desc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
        }
    }
}

/// Error parsing a [`SortOrder`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order: {0}")]
pub struct UnknownSortOrder(String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|order| order.as_str() == normalized)
            .ok_or_else(|| UnknownSortOrder(s.to_string()))
    }
}

// =============================================================================
// Filter set
// =============================================================================

/// The shopper's filter selection.
///
/// An empty facet set places no restriction on that facet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub categories: BTreeSet<CategoryId>,
    pub types: BTreeSet<TypeId>,
    pub styles: BTreeSet<StyleId>,
    pub genders: BTreeSet<Gender>,
    pub on_sale: bool,
    pub new_arrivals: bool,
    /// Free-text search on product names.
    pub search: String,
    pub sort: SortOrder,
}

impl FilterSet {
    /// The search text, if it is not blank.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        (!term.is_empty()).then_some(term)
    }

    /// Number of panel selections in effect, for the filter badge.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.categories.len()
            + self.types.len()
            + self.styles.len()
            + self.genders.len()
            + usize::from(self.on_sale)
            + usize::from(self.new_arrivals)
    }

    /// Merge facets supplied by navigation into this selection.
    pub fn apply_seed(&mut self, seed: &NavigationSeed) {
        if let Some(id) = seed.category_id {
            self.categories.insert(id);
        }
        if let Some(id) = seed.type_id {
            self.types.insert(id);
        }
        if let Some(gender) = seed.gender {
            self.genders.insert(gender);
        }
    }

    /// Open a staged copy for the filter panel.
    pub fn stage(&self) -> StagedFilters {
        StagedFilters {
            staged: self.clone(),
        }
    }
}

// =============================================================================
// Staged filters
// =============================================================================

/// Filter panel edits, isolated from the active selection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "staged filters do nothing until committed"]
pub struct StagedFilters {
    staged: FilterSet,
}

impl StagedFilters {
    /// The selection as currently edited.
    #[must_use]
    pub const fn staged(&self) -> &FilterSet {
        &self.staged
    }

    pub fn toggle_category(&mut self, id: CategoryId) -> &mut Self {
        toggle(&mut self.staged.categories, id);
        self
    }

    pub fn toggle_type(&mut self, id: TypeId) -> &mut Self {
        toggle(&mut self.staged.types, id);
        self
    }

    pub fn toggle_style(&mut self, id: StyleId) -> &mut Self {
        toggle(&mut self.staged.styles, id);
        self
    }

    pub fn toggle_gender(&mut self, gender: Gender) -> &mut Self {
        toggle(&mut self.staged.genders, gender);
        self
    }

    pub fn toggle_on_sale(&mut self) -> &mut Self {
        self.staged.on_sale = !self.staged.on_sale;
        self
    }

    pub fn toggle_new_arrivals(&mut self) -> &mut Self {
        self.staged.new_arrivals = !self.staged.new_arrivals;
        self
    }

    pub fn set_sort(&mut self, sort: SortOrder) -> &mut Self {
        self.staged.sort = sort;
        self
    }

    pub fn set_search(&mut self, text: impl Into<String>) -> &mut Self {
        self.staged.search = text.into();
        self
    }

    /// Clear every panel facet. Search text and sort order are kept.
    pub fn clear(&mut self) -> &mut Self {
        self.staged = FilterSet {
            search: std::mem::take(&mut self.staged.search),
            sort: self.staged.sort,
            ..FilterSet::default()
        };
        self
    }

    /// Finish editing and return the selection to make active.
    #[must_use]
    pub fn commit(self) -> FilterSet {
        self.staged
    }

    /// Close the panel without applying anything.
    pub fn discard(self) {}
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

// =============================================================================
// Navigation seed
// =============================================================================

/// Facets carried by a navigation link into the shop screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationSeed {
    pub category_id: Option<CategoryId>,
    pub type_id: Option<TypeId>,
    pub gender: Option<Gender>,
}

impl NavigationSeed {
    /// "Shop All": no facets.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            category_id: None,
            type_id: None,
            gender: None,
        }
    }

    #[must_use]
    pub const fn gender(gender: Gender) -> Self {
        Self {
            gender: Some(gender),
            ..Self::all()
        }
    }

    #[must_use]
    pub const fn category(id: CategoryId) -> Self {
        Self {
            category_id: Some(id),
            ..Self::all()
        }
    }

    #[must_use]
    pub const fn product_type(id: TypeId) -> Self {
        Self {
            type_id: Some(id),
            ..Self::all()
        }
    }
}
