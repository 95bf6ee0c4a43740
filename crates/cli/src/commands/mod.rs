//! Command implementations.
//!
//! Each command drives one storefront screen type and prints what the
//! screen would show.

pub mod auth;
pub mod browse;
pub mod home;
pub mod product;
pub mod shop;
pub mod wishlist;

pub use auth::AuthAction;
pub use product::ProductArgs;
pub use shop::ShopArgs;
pub use wishlist::WishlistAction;

use liftfit_core::{Gender, Size};
use liftfit_storefront::cards::ProductCard;
use liftfit_storefront::catalog::NavigationSeed;

/// Nominal screen width used to size cards.
const SCREEN_WIDTH: u32 = 400;

/// One line of a product list.
fn card_line(card: &ProductCard) -> String {
    match &card.original_price {
        Some(original) => format!("{}  {} (was {original}) SALE", card.title, card.price),
        None => format!("{}  {}", card.title, card.price),
    }
}

/// The `shop` invocation a navigation link leads to.
fn shop_hint(seed: &NavigationSeed) -> String {
    let mut hint = String::from("liftfit shop");
    if let Some(id) = seed.category_id {
        hint.push_str(&format!(" --category {id}"));
    }
    if let Some(id) = seed.type_id {
        hint.push_str(&format!(" --type {id}"));
    }
    if let Some(gender) = seed.gender {
        hint.push_str(&format!(" --gender {}", gender.as_str().to_ascii_lowercase()));
    }
    hint
}

fn parse_gender(s: &str) -> Result<Gender, String> {
    Gender::parse(s).ok_or_else(|| format!("unknown gender: {s} (men, women, unisex)"))
}

fn parse_size(s: &str) -> Result<Size, String> {
    Size::from_label(s).ok_or_else(|| format!("unknown size: {s} (XS to 3XL)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use liftfit_core::CategoryId;

    #[test]
    fn test_shop_hint() {
        assert_eq!(shop_hint(&NavigationSeed::all()), "liftfit shop");
        assert_eq!(
            shop_hint(&NavigationSeed::category(CategoryId::new(3))),
            "liftfit shop --category 3"
        );
        assert_eq!(
            shop_hint(&NavigationSeed::gender(Gender::Women)),
            "liftfit shop --gender women"
        );
    }

    #[test]
    fn test_parse_size_is_case_insensitive() {
        assert_eq!(parse_size("xl"), Ok(Size::ExtraLarge));
        assert!(parse_size("XXL").is_err());
    }
}
