//! Incremental catalog loading.
//!
//! [`CatalogPager`] owns the accumulated product list. Every fetch is issued
//! against a [`PageTicket`]; a reset bumps the generation so responses to
//! tickets from an earlier generation are dropped on arrival.

use std::collections::HashSet;
use std::fmt::Display;

use liftfit_core::ProductId;

use super::ProductSummary;

/// Permission to fetch one page under one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct PageTicket {
    generation: u64,
    page: u32,
}

impl PageTicket {
    /// Zero-based page index to fetch.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// What [`CatalogPager::complete`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The response belonged to a superseded generation and was ignored.
    Stale,
    /// Rows were merged; `added` new rows reached the list.
    Applied { added: usize },
    /// The fetch failed; the list is unchanged and paging stopped.
    Failed,
}

/// Paged product list with overlap and staleness protection.
#[derive(Debug)]
pub struct CatalogPager {
    page_size: u32,
    generation: u64,
    next_page: u32,
    has_more: bool,
    busy: bool,
    items: Vec<ProductSummary>,
    seen: HashSet<ProductId>,
}

impl CatalogPager {
    /// Create an empty pager. Call [`Self::reset`] to start loading.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            generation: 0,
            next_page: 0,
            has_more: false,
            busy: false,
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Start over at page 0 under a new generation.
    ///
    /// The current list stays visible until the page-0 response replaces it.
    pub fn reset(&mut self) -> PageTicket {
        self.generation += 1;
        self.next_page = 0;
        self.has_more = true;
        self.busy = true;
        PageTicket {
            generation: self.generation,
            page: 0,
        }
    }

    /// Ticket for the next page, unless a fetch is in flight or the list is
    /// exhausted.
    pub fn next_page(&mut self) -> Option<PageTicket> {
        if self.busy || !self.has_more {
            return None;
        }
        self.busy = true;
        Some(PageTicket {
            generation: self.generation,
            page: self.next_page,
        })
    }

    /// Apply the result of a fetch made under `ticket`.
    pub fn complete<E: Display>(
        &mut self,
        ticket: PageTicket,
        result: Result<Vec<ProductSummary>, E>,
    ) -> PageOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                page = ticket.page,
                "Dropping stale catalog page"
            );
            return PageOutcome::Stale;
        }
        self.busy = false;

        let rows = match result {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(page = ticket.page, error = %e, "Error fetching products");
                self.has_more = false;
                return PageOutcome::Failed;
            }
        };

        let full_page = u32::try_from(rows.len()).is_ok_and(|n| n >= self.page_size);

        if ticket.page == 0 {
            self.items.clear();
            self.seen.clear();
        }

        let before = self.items.len();
        for row in rows {
            if self.seen.insert(row.id) {
                self.items.push(row);
            }
        }

        self.has_more = full_page;
        self.next_page = ticket.page + 1;

        PageOutcome::Applied {
            added: self.items.len() - before,
        }
    }

    /// Products loaded so far, in first-appearance order.
    #[must_use]
    pub fn items(&self) -> &[ProductSummary] {
        &self.items
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether a fetch for the current generation is outstanding.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }
}
