//! Product queries.
//!
//! Turns a [`FilterSet`] and a page index into one [`Select`] on `products`.

use std::collections::BTreeSet;
use std::fmt::Display;

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::backend::{Direction, Filter, Select};
use crate::config::CatalogConfig;

use super::filters::FilterSet;

/// One page of a filtered product listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub filters: FilterSet,
    pub page: u32,
    pub page_size: u32,
    /// When the request was made; the new-arrivals window ends here.
    pub requested_at: DateTime<Utc>,
    pub new_arrivals_window: Duration,
}

impl ProductQuery {
    /// Build a query for `page` using the catalog settings.
    #[must_use]
    pub fn new(
        filters: FilterSet,
        page: u32,
        config: &CatalogConfig,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            filters,
            page,
            page_size: config.page_size,
            requested_at,
            new_arrivals_window: config.new_arrivals_window(),
        }
    }

    /// Earliest creation time admitted by the new-arrivals facet.
    #[must_use]
    pub fn new_arrivals_since(&self) -> DateTime<Utc> {
        self.requested_at - self.new_arrivals_window
    }

    /// Render the row query.
    #[must_use]
    pub fn to_select(&self) -> Select {
        let f = &self.filters;
        let (sort_column, direction) = f.sort.clause();

        Select::from("products")
            .filter_opt(facet("category_id", &f.categories))
            .filter_opt(facet("type_id", &f.types))
            .filter_opt(facet("style_id", &f.styles))
            .filter_opt(facet("gender", &f.genders))
            // Same range `pricing_from_row` displays as a discount.
            .filter_opt(f.on_sale.then(|| Filter::gt("discount", 0)))
            .filter_opt(f.on_sale.then(|| Filter::lt("discount", 1)))
            .filter_opt(f.new_arrivals.then(|| {
                Filter::gte(
                    "created_at",
                    self.new_arrivals_since()
                        .to_rfc3339_opts(SecondsFormat::Secs, true),
                )
            }))
            .filter_opt(f.search_term().map(|term| Filter::contains_ci("name", term)))
            .order(sort_column, direction)
            .order("id", Direction::Ascending)
            .page(self.page, self.page_size)
    }
}

fn facet<T: Display>(column: &str, values: &BTreeSet<T>) -> Option<Filter> {
    (!values.is_empty()).then(|| Filter::in_list(column, values))
}
