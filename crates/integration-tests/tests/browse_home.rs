//! Browse and home screens.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use chrono::Duration;
use rust_decimal_macros::dec;

use liftfit_core::Gender;
use liftfit_integration_tests::{FakeBackend, Failures, fixed_now, product};
use liftfit_storefront::catalog::{
    BrowseScreen, HomeScreen, NavigationSeed, SECTION_SAMPLE_SIZE, ShopScreen,
};
use liftfit_storefront::config::CatalogConfig;

#[tokio::test]
async fn test_browse_sections_sample_each_category() {
    let backend = FakeBackend::new();
    let tops = backend.add_category(1, "Tops");
    let bottoms = backend.add_category(2, "Bottoms");
    let accessories = backend.add_category(3, "Accessories");
    backend.add_type(10, "tees", tops);
    backend.add_type(11, "hoodies", tops);
    backend.add_type(20, "shorts", bottoms);

    for i in 0..8 {
        let mut p = product(&format!("Tee {i}"), dec!(25), 1);
        p.category_id = Some(tops);
        backend.add_product(p);
    }
    let mut shorts = product("Squat Shorts", dec!(30), 1);
    shorts.category_id = Some(bottoms);
    backend.add_product(shorts);
    // A category with products but no types is left out.
    let mut belt = product("Lifting Belt", dec!(45), 1);
    belt.category_id = Some(accessories);
    backend.add_product(belt);

    let screen = BrowseScreen::load(&backend).await;

    assert_eq!(screen.sections.len(), 2);
    let top_section = &screen.sections[0];
    assert_eq!(top_section.title, "Tops");
    assert_eq!(top_section.products.len(), SECTION_SAMPLE_SIZE);
    assert!(
        top_section
            .products
            .iter()
            .all(|p| p.category_id == Some(tops))
    );
    let labels: Vec<_> = top_section.types.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, vec!["Tees", "Hoodies"]);
    assert_eq!(screen.sections[1].products.len(), 1);
}

#[tokio::test]
async fn test_browse_links_seed_the_shop() {
    let backend = FakeBackend::new();
    let bottoms = backend.add_category(2, "Bottoms");
    let shorts_type = backend.add_type(20, "shorts", bottoms);
    let mut shorts = product("Squat Shorts", dec!(30), 1);
    shorts.category_id = Some(bottoms);
    shorts.type_id = Some(shorts_type);
    shorts.gender = Some(Gender::Men);
    backend.add_product(shorts);
    backend.add_product(product("Sports Bra", dec!(30), 1));

    let browse = BrowseScreen::load(&backend).await;
    let seed = browse.sections[0].types[0].seed();

    let config = CatalogConfig {
        page_size: 20,
        new_arrivals_days: 30,
    };
    let mut shop = ShopScreen::new(backend.clone(), config);
    shop.enter(&seed).await;
    assert_eq!(shop.products().len(), 1);
    assert_eq!(shop.products()[0].name, "Squat Shorts");

    let shortcuts = BrowseScreen::shortcuts();
    assert_eq!(shortcuts[0].seed, NavigationSeed::all());
    assert_eq!(shortcuts[1].seed, NavigationSeed::gender(Gender::Men));
}

#[tokio::test]
async fn test_browse_survives_lookup_failure() {
    let backend = FakeBackend::new();
    backend.add_product(product("Stringer", dec!(20), 1));
    backend.set_failures(Failures {
        lookups: true,
        ..Failures::default()
    });

    let screen = BrowseScreen::load(&backend).await;
    assert!(screen.sections.is_empty());
}

#[tokio::test]
async fn test_home_shows_latest_news_first() {
    let backend = FakeBackend::new();
    backend.add_category(1, "Tops");
    for i in 0..7 {
        backend.add_news(i, &format!("Drop {i}"), fixed_now() - Duration::days(i64::from(i)));
    }

    let home = HomeScreen::load(&backend).await;

    let titles: Vec<_> = home.news.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Drop 0", "Drop 1", "Drop 2", "Drop 3", "Drop 4"]);
    let links = home.category_links();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].0, "Tops");
}
