//! Shop screen.
//!
//! Holds the facet lookup tables, the active [`FilterSet`] and the
//! [`CatalogPager`]. Every change to search text or filters refetches page 0.

use chrono::Utc;
use tracing::instrument;

use crate::config::CatalogConfig;
use crate::error::add_breadcrumb;

use super::filters::{FilterSet, NavigationSeed, StagedFilters};
use super::pager::{CatalogPager, PageOutcome, PageTicket};
use super::query::ProductQuery;
use super::{CatalogSource, Category, ProductSummary, ProductType, Style};

/// State behind the shop screen.
pub struct ShopScreen<S> {
    source: S,
    config: CatalogConfig,
    categories: Vec<Category>,
    product_types: Vec<ProductType>,
    styles: Vec<Style>,
    filters: FilterSet,
    pager: CatalogPager,
    seeded: bool,
}

impl<S: CatalogSource> ShopScreen<S> {
    #[must_use]
    pub fn new(source: S, config: CatalogConfig) -> Self {
        let pager = CatalogPager::new(config.page_size);
        Self {
            source,
            config,
            categories: Vec::new(),
            product_types: Vec::new(),
            styles: Vec::new(),
            filters: FilterSet::default(),
            pager,
            seeded: false,
        }
    }

    /// Screen entry: load facet tables, seed navigation facets once, then
    /// fetch page 0.
    ///
    /// Lookup failures are logged; the tables that did load are kept.
    #[instrument(skip_all)]
    pub async fn enter(&mut self, seed: &NavigationSeed) {
        self.load_facets(seed).await;
        self.reload().await;
    }

    /// The lookup and seeding half of [`ShopScreen::enter`], without the
    /// page 0 fetch.
    ///
    /// For callers that apply panel edits right away: the apply fetches
    /// page 0 once with everything in effect.
    #[instrument(skip_all)]
    pub async fn load_facets(&mut self, seed: &NavigationSeed) {
        let (categories, product_types, styles) = tokio::join!(
            self.source.categories(),
            self.source.product_types(),
            self.source.styles(),
        );

        match categories {
            Ok(rows) => self.categories = rows,
            Err(e) => tracing::error!(error = %e, "Error fetching categories"),
        }
        match product_types {
            Ok(rows) => self.product_types = rows,
            Err(e) => tracing::error!(error = %e, "Error fetching product types"),
        }
        match styles {
            Ok(rows) => self.styles = rows,
            Err(e) => tracing::error!(error = %e, "Error fetching styles"),
        }

        if !self.seeded {
            self.filters.apply_seed(seed);
            self.seeded = true;
        }
    }

    /// Replace the search text and refetch from page 0.
    pub async fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.filters.search {
            return;
        }
        self.filters.search = text;
        self.reload().await;
    }

    /// Open the filter panel on a copy of the active filters.
    pub fn open_panel(&self) -> StagedFilters {
        self.filters.stage()
    }

    /// Apply the panel's edits and refetch from page 0.
    pub async fn apply_panel(&mut self, staged: StagedFilters) {
        self.filters = staged.commit();
        let active = self.filters.active_count().to_string();
        add_breadcrumb(
            "catalog",
            "Applied filters",
            Some(&[("active", active.as_str()), ("sort", self.filters.sort.as_str())]),
        );
        self.reload().await;
    }

    /// Fetch the next page if paging is idle and more rows exist.
    ///
    /// Returns `false` when nothing was fetched.
    pub async fn load_more(&mut self) -> bool {
        let Some(ticket) = self.pager.next_page() else {
            return false;
        };
        self.fetch(ticket).await;
        true
    }

    /// Refetch page 0 with the current filters.
    pub async fn refresh(&mut self) {
        self.reload().await;
    }

    /// The query a ticket should be fetched with.
    #[must_use]
    pub fn query_for(&self, ticket: PageTicket) -> ProductQuery {
        ProductQuery::new(self.filters.clone(), ticket.page(), &self.config, Utc::now())
    }

    async fn reload(&mut self) {
        let ticket = self.pager.reset();
        self.fetch(ticket).await;
    }

    async fn fetch(&mut self, ticket: PageTicket) -> PageOutcome {
        let query = self.query_for(ticket);
        let result = self.source.products(&query).await;
        self.pager.complete(ticket, result)
    }

    #[must_use]
    pub fn products(&self) -> &[ProductSummary] {
        self.pager.items()
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.pager.has_more()
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterSet {
        &self.filters
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn product_types(&self) -> &[ProductType] {
        &self.product_types
    }

    #[must_use]
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }
}
