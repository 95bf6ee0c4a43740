//! Browse screen.
//!
//! Fixed "Shop All / Men / Women" shortcuts, then one section per category
//! showing a random sample of its products and links to its product types.

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::instrument;

use liftfit_core::{CategoryId, Gender, TypeId};

use super::filters::NavigationSeed;
use super::{CatalogSource, Category, ProductSummary, ProductType};

/// Products shown per category section.
pub const SECTION_SAMPLE_SIZE: usize = 5;

/// A fixed navigation entry at the top of the browse screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowseShortcut {
    pub label: &'static str,
    pub seed: NavigationSeed,
}

/// Entries shown above the category sections.
pub const SHORTCUTS: [BrowseShortcut; 3] = [
    BrowseShortcut {
        label: "Shop All",
        seed: NavigationSeed::all(),
    },
    BrowseShortcut {
        label: "Shop Men",
        seed: NavigationSeed::gender(Gender::Men),
    },
    BrowseShortcut {
        label: "Shop Women",
        seed: NavigationSeed::gender(Gender::Women),
    },
];

/// A product type link within a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeLink {
    pub id: TypeId,
    /// Type name with its first letter capitalised.
    pub label: String,
}

impl TypeLink {
    #[must_use]
    pub const fn seed(&self) -> NavigationSeed {
        NavigationSeed::product_type(self.id)
    }
}

/// One category's section.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseSection {
    pub category_id: CategoryId,
    pub title: String,
    pub products: Vec<ProductSummary>,
    pub types: Vec<TypeLink>,
}

impl BrowseSection {
    /// Where "View all" leads.
    #[must_use]
    pub const fn seed(&self) -> NavigationSeed {
        NavigationSeed::category(self.category_id)
    }
}

/// Loaded browse screen.
#[derive(Debug, Clone, Default)]
pub struct BrowseScreen {
    pub sections: Vec<BrowseSection>,
}

impl BrowseScreen {
    /// Fetch products, categories and types concurrently and build sections.
    ///
    /// A failed fetch is logged and treated as empty.
    #[instrument(skip_all)]
    pub async fn load<S: CatalogSource>(source: &S) -> Self {
        let (products, categories, types) = tokio::join!(
            source.all_products(),
            source.categories(),
            source.product_types(),
        );

        let products = products
            .inspect_err(|e| tracing::error!(error = %e, "Error fetching products"))
            .unwrap_or_default();
        let categories = categories
            .inspect_err(|e| tracing::error!(error = %e, "Error fetching categories"))
            .unwrap_or_default();
        let types = types
            .inspect_err(|e| tracing::error!(error = %e, "Error fetching product types"))
            .unwrap_or_default();

        Self {
            sections: build_sections(&categories, &types, &products, &mut rand::rng()),
        }
    }

    /// The fixed shortcuts.
    #[must_use]
    pub const fn shortcuts() -> &'static [BrowseShortcut] {
        &SHORTCUTS
    }
}

/// Build one section per category that has both products and types.
#[must_use]
pub fn build_sections<R: Rng + ?Sized>(
    categories: &[Category],
    types: &[ProductType],
    products: &[ProductSummary],
    rng: &mut R,
) -> Vec<BrowseSection> {
    categories
        .iter()
        .filter_map(|category| {
            let in_category: Vec<ProductSummary> = products
                .iter()
                .filter(|p| p.category_id == Some(category.id))
                .cloned()
                .collect();
            let type_links: Vec<TypeLink> = types
                .iter()
                .filter(|t| t.category_id == Some(category.id))
                .map(|t| TypeLink {
                    id: t.id,
                    label: capitalize_first(&t.name),
                })
                .collect();

            if in_category.is_empty() || type_links.is_empty() {
                return None;
            }

            Some(BrowseSection {
                category_id: category.id,
                title: category.name.clone(),
                products: sample(in_category, SECTION_SAMPLE_SIZE, rng),
                types: type_links,
            })
        })
        .collect()
}

/// Up to `count` items chosen at random; every item, in order, when there
/// are no more than `count`.
fn sample<T: Clone, R: Rng + ?Sized>(items: Vec<T>, count: usize, rng: &mut R) -> Vec<T> {
    if items.len() <= count {
        return items;
    }
    items.choose_multiple(rng, count).cloned().collect()
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
