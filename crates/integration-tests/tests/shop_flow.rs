//! Shop screen: navigation seeds, the staged filter panel and paging.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::HashSet;

use rust_decimal_macros::dec;

use liftfit_core::Gender;
use liftfit_integration_tests::{FakeBackend, Failures, product};
use liftfit_storefront::catalog::{NavigationSeed, ShopScreen, SortOrder};
use liftfit_storefront::config::CatalogConfig;

fn config(page_size: u32) -> CatalogConfig {
    CatalogConfig {
        page_size,
        new_arrivals_days: 30,
    }
}

fn gendered(backend: &FakeBackend, name: &str, gender: Gender, age_days: i64) {
    let mut p = product(name, dec!(40), age_days);
    p.gender = Some(gender);
    backend.add_product(p);
}

fn names<S: liftfit_storefront::catalog::CatalogSource>(screen: &ShopScreen<S>) -> Vec<&str> {
    screen.products().iter().map(|p| p.name.as_str()).collect()
}

#[tokio::test]
async fn test_gender_seed_filters_first_page() {
    let backend = FakeBackend::new();
    gendered(&backend, "Sports Bra", Gender::Women, 1);
    gendered(&backend, "Leggings", Gender::Women, 2);
    gendered(&backend, "Stringer", Gender::Men, 3);

    let mut screen = ShopScreen::new(backend.clone(), config(20));
    screen.enter(&NavigationSeed::gender(Gender::Women)).await;

    assert!(screen.filters().genders.contains(&Gender::Women));
    assert_eq!(screen.products().len(), 2);
    assert!(
        screen
            .products()
            .iter()
            .all(|p| p.gender == Some(Gender::Women))
    );
}

#[tokio::test]
async fn test_seed_is_applied_once() {
    let backend = FakeBackend::new();
    gendered(&backend, "Sports Bra", Gender::Women, 1);
    gendered(&backend, "Stringer", Gender::Men, 2);

    let mut screen = ShopScreen::new(backend.clone(), config(20));
    screen.enter(&NavigationSeed::gender(Gender::Women)).await;

    // Returning to the screen keeps the shopper's current filters.
    screen.enter(&NavigationSeed::gender(Gender::Men)).await;

    assert!(!screen.filters().genders.contains(&Gender::Men));
    assert_eq!(names(&screen), vec!["Sports Bra"]);
}

#[tokio::test]
async fn test_panel_edits_apply_only_on_commit() {
    let backend = FakeBackend::new();
    let mut discounted = product("Pump Cover", dec!(50), 1);
    discounted.discount = Some(dec!(0.2));
    backend.add_product(discounted);
    backend.add_product(product("Oversized Tee", dec!(30), 2));

    let mut screen = ShopScreen::new(backend.clone(), config(20));
    screen.enter(&NavigationSeed::all()).await;
    let queries_before = backend.product_queries().len();

    let mut panel = screen.open_panel();
    panel.toggle_on_sale().set_sort(SortOrder::PriceDesc);
    assert!(!screen.filters().on_sale);
    assert_eq!(screen.products().len(), 2);

    // Discarding leaves everything as it was.
    panel.discard();
    assert_eq!(backend.product_queries().len(), queries_before);

    let mut panel = screen.open_panel();
    panel.toggle_on_sale();
    screen.apply_panel(panel).await;

    assert!(screen.filters().on_sale);
    assert_eq!(names(&screen), vec!["Pump Cover"]);
    let last = backend.product_queries().pop().unwrap();
    assert_eq!(last.page, 0);
}

#[tokio::test]
async fn test_clearing_panel_keeps_search_and_sort() {
    let backend = FakeBackend::new();
    let mut screen = ShopScreen::new(backend.clone(), config(20));
    screen.enter(&NavigationSeed::gender(Gender::Women)).await;
    screen.set_search("tee").await;

    let mut panel = screen.open_panel();
    panel.set_sort(SortOrder::NameAsc).toggle_new_arrivals();
    screen.apply_panel(panel).await;

    let mut panel = screen.open_panel();
    panel.clear();
    screen.apply_panel(panel).await;

    let filters = screen.filters();
    assert_eq!(filters.active_count(), 0);
    assert_eq!(filters.search, "tee");
    assert_eq!(filters.sort, SortOrder::NameAsc);
}

#[tokio::test]
async fn test_pages_merge_without_duplicates() {
    let backend = FakeBackend::new();
    for (i, name) in ["A", "B", "C", "D", "E"].into_iter().enumerate() {
        backend.add_product(product(name, dec!(20), i64::try_from(i).unwrap() + 1));
    }

    let mut screen = ShopScreen::new(backend.clone(), config(2));
    screen.enter(&NavigationSeed::all()).await;
    let mut panel = screen.open_panel();
    panel.set_sort(SortOrder::CreatedDesc);
    screen.apply_panel(panel).await;
    assert_eq!(names(&screen), vec!["A", "B"]);

    // A newer product shifts every later page by one row.
    backend.add_product(product("New", dec!(20), 0));

    assert!(screen.load_more().await);
    assert_eq!(names(&screen), vec!["A", "B", "C"]);
    assert!(screen.has_more());

    assert!(screen.load_more().await);
    assert_eq!(names(&screen), vec!["A", "B", "C", "D", "E"]);

    let ids: HashSet<_> = screen.products().iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), screen.products().len());
}

#[tokio::test]
async fn test_short_page_ends_paging() {
    let backend = FakeBackend::new();
    for name in ["A", "B", "C"] {
        backend.add_product(product(name, dec!(20), 1));
    }

    let mut screen = ShopScreen::new(backend.clone(), config(2));
    screen.enter(&NavigationSeed::all()).await;
    assert!(screen.has_more());

    assert!(screen.load_more().await);
    assert_eq!(screen.products().len(), 3);
    assert!(!screen.has_more());

    let queries = backend.product_queries().len();
    assert!(!screen.load_more().await);
    assert_eq!(backend.product_queries().len(), queries);
}

#[tokio::test]
async fn test_failed_page_keeps_loaded_products() {
    let backend = FakeBackend::new();
    for name in ["A", "B", "C", "D"] {
        backend.add_product(product(name, dec!(20), 1));
    }

    let mut screen = ShopScreen::new(backend.clone(), config(2));
    screen.enter(&NavigationSeed::all()).await;
    assert_eq!(screen.products().len(), 2);

    backend.set_failures(Failures {
        products: true,
        ..Failures::default()
    });
    assert!(screen.load_more().await);
    assert_eq!(screen.products().len(), 2);
    assert!(!screen.has_more());

    backend.set_failures(Failures::default());
    screen.refresh().await;
    assert_eq!(screen.products().len(), 2);
    assert!(screen.has_more());
}

#[tokio::test]
async fn test_search_restarts_from_first_page() {
    let backend = FakeBackend::new();
    for name in ["Seamless Tee", "Oversized Tee", "Joggers", "Shorts"] {
        backend.add_product(product(name, dec!(20), 1));
    }

    let mut screen = ShopScreen::new(backend.clone(), config(2));
    screen.enter(&NavigationSeed::all()).await;
    assert!(screen.load_more().await);

    screen.set_search("  TEE ").await;

    let last = backend.product_queries().pop().unwrap();
    assert_eq!(last.page, 0);
    assert_eq!(last.filters.search_term(), Some("TEE"));
    assert_eq!(screen.products().len(), 2);
    assert!(screen.products().iter().all(|p| p.name.ends_with("Tee")));

    // Same text again issues no query.
    let queries = backend.product_queries().len();
    screen.set_search("  TEE ").await;
    assert_eq!(backend.product_queries().len(), queries);
}

#[tokio::test]
async fn test_new_arrivals_window() {
    let backend = FakeBackend::new();
    backend.add_product(product("Fresh Drop", dec!(20), 3));
    backend.add_product(product("Classic", dec!(20), 90));

    let mut screen = ShopScreen::new(backend.clone(), config(20));
    screen.enter(&NavigationSeed::all()).await;
    let mut panel = screen.open_panel();
    panel.toggle_new_arrivals();
    screen.apply_panel(panel).await;

    assert_eq!(names(&screen), vec!["Fresh Drop"]);
}

#[tokio::test]
async fn test_lookup_failure_still_lists_products() {
    let backend = FakeBackend::new();
    backend.add_category(1, "Tops");
    backend.add_product(product("Stringer", dec!(20), 1));
    backend.set_failures(Failures {
        lookups: true,
        ..Failures::default()
    });

    let mut screen = ShopScreen::new(backend.clone(), config(20));
    screen.enter(&NavigationSeed::all()).await;

    assert!(screen.categories().is_empty());
    assert_eq!(screen.products().len(), 1);
}

#[tokio::test]
async fn test_staged_panel_with_search_fetches_first_page_once() {
    let backend = FakeBackend::new();
    let mut bra = product("Sports Bra", dec!(40), 1);
    bra.gender = Some(Gender::Women);
    bra.discount = Some(dec!(0.2));
    backend.add_product(bra);
    gendered(&backend, "Seamless Bra", Gender::Women, 2);
    gendered(&backend, "Leggings", Gender::Women, 3);

    let mut screen = ShopScreen::new(backend.clone(), config(20));
    screen
        .load_facets(&NavigationSeed::gender(Gender::Women))
        .await;
    assert!(backend.product_queries().is_empty());

    let mut panel = screen.open_panel();
    panel.toggle_on_sale().set_search("bra");
    screen.apply_panel(panel).await;

    let queries = backend.product_queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].page, 0);
    assert!(queries[0].filters.on_sale);
    assert_eq!(queries[0].filters.search_term(), Some("bra"));
    assert!(queries[0].filters.genders.contains(&Gender::Women));
    assert_eq!(names(&screen), ["Sports Bra"]);
}

#[tokio::test]
async fn test_on_sale_skips_discounts_that_show_no_sale_price() {
    let backend = FakeBackend::new();
    let mut sale = product("Lifting Belt", dec!(80), 5);
    sale.discount = Some(dec!(0.25));
    backend.add_product(sale);
    let mut broken = product("Wrist Wraps", dec!(20), 5);
    broken.discount = Some(dec!(1));
    backend.add_product(broken);

    let mut screen = ShopScreen::new(backend.clone(), config(20));
    screen.enter(&NavigationSeed::all()).await;
    let mut panel = screen.open_panel();
    panel.toggle_on_sale();
    screen.apply_panel(panel).await;

    assert_eq!(names(&screen), ["Lifting Belt"]);
    assert!(screen.products()[0].pricing().has_discount());
}
