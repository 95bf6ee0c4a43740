//! Wishlist toggling from the product page and the wishlist screen.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use rust_decimal_macros::dec;

use liftfit_core::{ProductId, Size, UserId};
use liftfit_integration_tests::{FakeBackend, Failures, product, review_images, session_for};
use liftfit_storefront::cards::WishlistCard;
use liftfit_storefront::product::ProductPage;
use liftfit_storefront::wishlist::{WishlistError, WishlistScreen, WishlistToggle};

/// A hoodie in Black (M: 5, L: 0) and Grey (M: 2).
fn hoodie(backend: &FakeBackend) -> ProductId {
    let mut p = product("Pump Cover Hoodie", dec!(60), 10);
    p.discount = Some(dec!(0.5));
    let id = p.id;
    backend.add_product(p);

    let black = backend.add_color(id, "Black");
    backend.add_stock(black, Size::Medium, 5);
    backend.add_stock(black, Size::Large, 0);
    let grey = backend.add_color(id, "Grey");
    backend.add_stock(grey, Size::Medium, 2);
    id
}

async fn open(backend: &FakeBackend, id: ProductId) -> ProductPage {
    ProductPage::load(backend, &review_images(), id)
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn test_toggle_is_reflected_on_next_visit() {
    let backend = FakeBackend::new();
    let id = hoodie(&backend);
    let user = UserId::random();
    let session = session_for(user);

    let page = open(&backend, id).await;
    let key = page.variants.wishlist_key(user, id);
    assert!(key.stock.is_some());

    let mut toggle = WishlistToggle::new();
    toggle.sync(&backend, &session, key).await.unwrap();
    assert!(toggle.is_loaded());
    assert!(!toggle.is_wishlisted());

    assert!(toggle.toggle(&backend, &session).await.unwrap());

    // A fresh page for the same variant reads membership back.
    let mut revisit = WishlistToggle::new();
    revisit.sync(&backend, &session, key).await.unwrap();
    assert!(revisit.is_wishlisted());

    assert!(!revisit.toggle(&backend, &session).await.unwrap());
    assert_eq!(backend.wishlist_len(), 0);
}

#[tokio::test]
async fn test_sizes_and_colors_are_separate_entries() {
    let backend = FakeBackend::new();
    let id = hoodie(&backend);
    let user = UserId::random();
    let session = session_for(user);
    let mut page = open(&backend, id).await;
    let mut toggle = WishlistToggle::new();

    let medium = page.variants.wishlist_key(user, id);
    toggle.sync(&backend, &session, medium).await.unwrap();
    toggle.toggle(&backend, &session).await.unwrap();

    page.variants.select_size(Size::Large);
    let large = page.variants.wishlist_key(user, id);
    assert_ne!(medium, large);
    toggle.sync(&backend, &session, large).await.unwrap();
    assert!(!toggle.is_wishlisted());

    let grey = page.variants.colors()[1].id;
    page.variants.select_color(grey);
    page.variants.select_size(Size::Medium);
    let grey_medium = page.variants.wishlist_key(user, id);
    assert_ne!(medium, grey_medium);
    toggle.sync(&backend, &session, grey_medium).await.unwrap();
    assert!(!toggle.is_wishlisted());

    toggle.sync(&backend, &session, medium).await.unwrap();
    assert!(toggle.is_wishlisted());
}

#[tokio::test]
async fn test_size_without_stock_row_is_keyed_without_stock() {
    let backend = FakeBackend::new();
    let id = hoodie(&backend);
    let user = UserId::random();
    let mut page = open(&backend, id).await;

    page.variants.select_size(Size::ExtraSmall);
    let key = page.variants.wishlist_key(user, id);
    assert!(key.color.is_some());
    assert_eq!(key.stock, None);
}

#[tokio::test]
async fn test_failed_write_leaves_state_unchanged() {
    let backend = FakeBackend::new();
    let id = hoodie(&backend);
    let user = UserId::random();
    let session = session_for(user);
    let page = open(&backend, id).await;

    let mut toggle = WishlistToggle::new();
    toggle
        .sync(&backend, &session, page.variants.wishlist_key(user, id))
        .await
        .unwrap();

    backend.set_failures(Failures {
        wishlist_writes: true,
        ..Failures::default()
    });
    let err = toggle.toggle(&backend, &session).await.unwrap_err();
    assert!(matches!(err, WishlistError::Backend(_)));
    assert!(!toggle.is_wishlisted());
    assert_eq!(backend.wishlist_len(), 0);

    backend.set_failures(Failures::default());
    assert!(toggle.toggle(&backend, &session).await.unwrap());
}

#[tokio::test]
async fn test_failed_lookup_never_duplicates_a_row() {
    let backend = FakeBackend::new();
    let id = hoodie(&backend);
    let user = UserId::random();
    let session = session_for(user);
    let page = open(&backend, id).await;
    let key = page.variants.wishlist_key(user, id);

    let mut first = WishlistToggle::new();
    first.sync(&backend, &session, key).await.unwrap();
    first.toggle(&backend, &session).await.unwrap();
    assert_eq!(backend.wishlist_len(), 1);

    backend.set_failures(Failures {
        wishlist_reads: true,
        ..Failures::default()
    });
    let mut toggle = WishlistToggle::new();
    let err = toggle.sync(&backend, &session, key).await.unwrap_err();
    assert!(matches!(err, WishlistError::Backend(_)));
    assert!(!toggle.is_loaded());

    let err = toggle.toggle(&backend, &session).await.unwrap_err();
    assert!(matches!(err, WishlistError::Backend(_)));
    assert_eq!(backend.wishlist_len(), 1);

    // Once lookups work again the toggle finds the existing row and removes it.
    backend.set_failures(Failures::default());
    assert!(!toggle.toggle(&backend, &session).await.unwrap());
    assert!(toggle.is_loaded());
    assert_eq!(backend.wishlist_len(), 0);
}

#[tokio::test]
async fn test_toggle_requires_selection_and_owner() {
    let backend = FakeBackend::new();
    let id = hoodie(&backend);
    let session = session_for(UserId::random());
    let page = open(&backend, id).await;

    let mut toggle = WishlistToggle::new();
    let err = toggle.toggle(&backend, &session).await.unwrap_err();
    assert!(matches!(err, WishlistError::NoSelection));

    let someone_else = page.variants.wishlist_key(UserId::random(), id);
    let err = toggle
        .sync(&backend, &session, someone_else)
        .await
        .unwrap_err();
    assert!(matches!(err, WishlistError::WrongUser));
    assert!(!toggle.is_loaded());
}

#[tokio::test]
async fn test_wishlist_screen_lists_and_removes() {
    let backend = FakeBackend::new();
    let id = hoodie(&backend);
    let user = UserId::random();
    let session = session_for(user);
    let mut page = open(&backend, id).await;
    let mut toggle = WishlistToggle::new();

    // Black M (5 left) and Black L (sold out).
    for size in [Size::Large, Size::Medium] {
        page.variants.select_size(size);
        toggle
            .sync(&backend, &session, page.variants.wishlist_key(user, id))
            .await
            .unwrap();
        toggle.toggle(&backend, &session).await.unwrap();
    }

    // Another shopper's row never shows up.
    let other = UserId::random();
    let mut theirs = WishlistToggle::new();
    theirs
        .sync(&backend, &session_for(other), page.variants.wishlist_key(other, id))
        .await
        .unwrap();
    theirs.toggle(&backend, &session_for(other)).await.unwrap();

    let mut screen = WishlistScreen::default();
    screen.reload(&backend, &session).await.unwrap();
    assert_eq!(screen.entries().len(), 2);

    let cards: Vec<WishlistCard> = screen.entries().iter().map(WishlistCard::from_entry).collect();
    assert_eq!(cards[0].variant.as_deref(), Some("Black, M"));
    assert!(!cards[0].out_of_stock);
    assert_eq!(cards[0].price, "$30.00");
    assert_eq!(cards[0].original_price.as_deref(), Some("$60.00"));
    assert_eq!(cards[1].variant.as_deref(), Some("Black, L"));
    assert!(cards[1].out_of_stock);

    screen.remove(&backend, &session, cards[1].id).await.unwrap();
    assert_eq!(screen.entries().len(), 1);
    assert_eq!(backend.wishlist_len(), 2);
}
