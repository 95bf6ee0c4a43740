//! `liftfit home`.

use liftfit_storefront::catalog::HomeScreen;
use liftfit_storefront::error::Result;
use liftfit_storefront::state::AppState;

use super::shop_hint;

/// Print the news carousel and category links.
#[allow(clippy::print_stdout)]
pub async fn run(state: &AppState) -> Result<()> {
    let screen = HomeScreen::load(state.backend()).await;

    println!("LIFTFIT");
    println!();
    if screen.news.is_empty() {
        println!("No news right now.");
    }
    for post in &screen.news {
        println!("* {} ({})", post.title, post.created_at.format("%b %-d, %Y"));
        if let Some(content) = &post.content {
            println!("  {content}");
        }
    }

    println!();
    println!("Shop by category:");
    for (name, seed) in screen.category_links() {
        println!("  {name:<20} {}", shop_hint(&seed));
    }
    Ok(())
}
