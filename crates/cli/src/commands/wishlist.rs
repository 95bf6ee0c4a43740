//! `liftfit wishlist`.

use clap::Subcommand;

use liftfit_core::WishlistId;
use liftfit_storefront::cards::WishlistCard;
use liftfit_storefront::error::Result;
use liftfit_storefront::state::AppState;
use liftfit_storefront::wishlist::{WishlistScreen, WishlistToggle};

use super::auth::Credentials;
use super::product::{self, ProductArgs};

#[derive(Subcommand)]
pub enum WishlistAction {
    /// List wishlisted variants, best stocked first
    List {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Add a product variant
    Add {
        #[command(flatten)]
        product: ProductArgs,

        #[command(flatten)]
        credentials: Credentials,
    },
    /// Remove an entry by its wishlist ID
    Remove {
        /// Wishlist entry ID, as printed by `list`
        id: WishlistId,

        #[command(flatten)]
        credentials: Credentials,
    },
}

#[allow(clippy::print_stdout)]
pub async fn run(state: &AppState, action: WishlistAction) -> Result<()> {
    match action {
        WishlistAction::List { credentials } => {
            let session = credentials.login(state).await?;
            let mut screen = WishlistScreen::default();
            screen.reload(state.backend(), &session).await?;
            print_entries(&screen);
        }
        WishlistAction::Add {
            product: args,
            credentials,
        } => {
            let page = product::open(state, &args).await?;
            let session = credentials.login(state).await?;
            let key = page
                .variants
                .wishlist_key(session.user_id(), page.detail.id);

            let mut toggle = WishlistToggle::new();
            toggle.sync(state.backend(), &session, key).await?;

            let variant = page
                .variants
                .selection_label()
                .map_or_else(String::new, |label| format!(" ({label})"));
            if toggle.is_wishlisted() {
                println!("{}{variant} is already on your wishlist.", page.detail.name);
            } else {
                toggle.toggle(state.backend(), &session).await?;
                println!("Added {}{variant} to your wishlist.", page.detail.name);
            }
        }
        WishlistAction::Remove { id, credentials } => {
            let session = credentials.login(state).await?;
            let mut screen = WishlistScreen::default();
            screen.remove(state.backend(), &session, id).await?;
            print_entries(&screen);
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_entries(screen: &WishlistScreen) {
    if screen.is_empty() {
        println!("Your wishlist is empty.");
        return;
    }
    for entry in screen.entries() {
        let card = WishlistCard::from_entry(entry);
        let mut line = format!("{}  {}", card.id, card.title);
        if let Some(variant) = &card.variant {
            line.push_str(&format!(" ({variant})"));
        }
        line.push_str(&format!("  {}", card.price));
        if let Some(original) = &card.original_price {
            line.push_str(&format!(" (was {original})"));
        }
        if card.out_of_stock {
            line.push_str("  OUT OF STOCK");
        }
        println!("{line}");
    }
}
