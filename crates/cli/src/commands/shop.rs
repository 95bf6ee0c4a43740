//! `liftfit shop`.

use clap::Args;

use liftfit_core::{CategoryId, Gender, StyleId, TypeId};
use liftfit_storefront::cards::{CardLayout, ProductCard};
use liftfit_storefront::catalog::{NavigationSeed, ShopScreen, SortOrder};
use liftfit_storefront::error::Result;
use liftfit_storefront::state::AppState;

use super::{SCREEN_WIDTH, card_line, parse_gender};

/// Columns in the shop grid.
const GRID_COLUMNS: u32 = 2;
const GRID_MARGIN: u32 = 5;

#[derive(Args)]
pub struct ShopArgs {
    /// Category ID (repeatable)
    #[arg(long)]
    category: Vec<CategoryId>,

    /// Product type ID (repeatable)
    #[arg(long = "type")]
    product_type: Vec<TypeId>,

    /// Style ID (repeatable)
    #[arg(long)]
    style: Vec<StyleId>,

    /// Gender: men, women or unisex (repeatable)
    #[arg(long, value_parser = parse_gender)]
    gender: Vec<Gender>,

    /// Only discounted products
    #[arg(long)]
    on_sale: bool,

    /// Only products added recently
    #[arg(long = "new")]
    new_arrivals: bool,

    /// Case-insensitive name search
    #[arg(long)]
    search: Option<String>,

    /// price-asc, price-desc, created-asc, created-desc, name-asc or name-desc
    #[arg(long)]
    sort: Option<SortOrder>,

    /// Number of pages to load
    #[arg(long, default_value_t = 1)]
    pages: u32,

    /// Also list category, type and style IDs
    #[arg(long)]
    facets: bool,
}

impl ShopArgs {
    /// Navigation parameters, as if arriving from a browse or home link.
    fn seed(&self) -> NavigationSeed {
        NavigationSeed {
            category_id: self.category.first().copied(),
            type_id: self.product_type.first().copied(),
            gender: self.gender.first().copied(),
        }
    }
}

/// Load the shop screen with every filter staged in one panel apply, then
/// print the grid.
#[allow(clippy::print_stdout)]
pub async fn run(state: &AppState, args: ShopArgs) -> Result<()> {
    let mut screen = ShopScreen::new(state.backend().clone(), state.config().catalog);
    screen.load_facets(&args.seed()).await;

    let mut panel = screen.open_panel();
    for id in args.category.iter().skip(1) {
        panel.toggle_category(*id);
    }
    for id in args.product_type.iter().skip(1) {
        panel.toggle_type(*id);
    }
    for gender in args.gender.iter().skip(1) {
        panel.toggle_gender(*gender);
    }
    for id in &args.style {
        panel.toggle_style(*id);
    }
    if args.on_sale {
        panel.toggle_on_sale();
    }
    if args.new_arrivals {
        panel.toggle_new_arrivals();
    }
    if let Some(sort) = args.sort {
        panel.set_sort(sort);
    }
    if let Some(search) = args.search {
        panel.set_search(search);
    }
    if panel.staged() == screen.filters() {
        panel.discard();
        screen.refresh().await;
    } else {
        screen.apply_panel(panel).await;
    }

    for _ in 1..args.pages {
        if !screen.load_more().await {
            break;
        }
    }

    if args.facets {
        for c in screen.categories() {
            println!("category {:>4}  {}", c.id, c.name);
        }
        for t in screen.product_types() {
            println!("type     {:>4}  {}", t.id, t.name);
        }
        for s in screen.styles() {
            println!("style    {}  {}", s.id, s.name);
        }
        println!();
    }

    let filters = screen.filters();
    println!(
        "Sort: {}  Filters: {}",
        filters.sort.label(),
        filters.active_count()
    );

    let layout = CardLayout::grid(SCREEN_WIDTH, GRID_COLUMNS, GRID_MARGIN);
    if screen.products().is_empty() {
        println!("No products found.");
    }
    for product in screen.products() {
        let card = ProductCard::from_product(product, layout);
        println!("{}  {}", product.id, card_line(&card));
    }
    if screen.has_more() {
        println!("... more available (--pages {})", args.pages + 1);
    }
    Ok(())
}
