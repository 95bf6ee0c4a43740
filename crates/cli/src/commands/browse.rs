//! `liftfit browse`.

use liftfit_storefront::cards::{CardLayout, ProductCard};
use liftfit_storefront::catalog::BrowseScreen;
use liftfit_storefront::error::Result;
use liftfit_storefront::state::AppState;

use super::{card_line, shop_hint};

/// Print the shortcuts and one sampled row per category.
#[allow(clippy::print_stdout)]
pub async fn run(state: &AppState) -> Result<()> {
    let screen = BrowseScreen::load(state.backend()).await;

    for shortcut in BrowseScreen::shortcuts() {
        println!("{:<12} {}", shortcut.label, shop_hint(&shortcut.seed));
    }

    for section in &screen.sections {
        println!();
        println!("{}  ({})", section.title, shop_hint(&section.seed()));
        for product in &section.products {
            let card = ProductCard::from_product(product, CardLayout::browse_row());
            println!("  {}", card_line(&card));
        }
        if !section.types.is_empty() {
            let types: Vec<&str> = section.types.iter().map(|t| t.label.as_str()).collect();
            println!("  Types: {}", types.join(", "));
        }
    }
    Ok(())
}
