//! `liftfit product`.

use chrono::Utc;
use clap::Args;

use liftfit_core::{ProductId, Size};
use liftfit_storefront::error::{AppError, Result};
use liftfit_storefront::product::ProductPage;
use liftfit_storefront::reviews::average_rating;
use liftfit_storefront::state::AppState;

use super::parse_size;

/// A product and the variant to select on its page.
#[derive(Args)]
pub struct ProductArgs {
    /// Product ID
    pub id: ProductId,

    /// Color name; defaults to the first color
    #[arg(long)]
    pub color: Option<String>,

    /// Size label (XS to 3XL); defaults to M
    #[arg(long, value_parser = parse_size)]
    pub size: Option<Size>,
}

/// Load a product page with the requested variant selected.
pub(crate) async fn open(state: &AppState, args: &ProductArgs) -> Result<ProductPage> {
    let mut page = ProductPage::load(state.backend(), state.review_images(), args.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

    if let Some(name) = &args.color {
        let id = page
            .variants
            .colors()
            .iter()
            .find(|c| c.color.eq_ignore_ascii_case(name))
            .map(|c| c.id)
            .ok_or_else(|| AppError::BadRequest(format!("No color named {name}.")))?;
        page.variants.select_color(id);
    }
    if let Some(size) = args.size {
        page.variants.select_size(size);
    }
    Ok(page)
}

/// Print the product page.
#[allow(clippy::print_stdout)]
pub async fn run(state: &AppState, args: ProductArgs) -> Result<()> {
    let page = open(state, &args).await?;
    let detail = &page.detail;
    let pricing = detail.pricing();

    let mut title = detail.name.clone();
    if detail.is_new_item(Utc::now()) {
        title.push_str("  NEW");
    }
    println!("{title}");

    let breadcrumbs: Vec<&str> = [detail.category_name(), detail.type_name(), detail.style_name()]
        .into_iter()
        .flatten()
        .collect();
    if !breadcrumbs.is_empty() {
        println!("{}", breadcrumbs.join(" / "));
    }

    if let Some(discount) = pricing.active_discount() {
        println!(
            "{} (was {}, {}% off)",
            pricing.sale_price().display(),
            pricing.base().display(),
            discount.percent().normalize()
        );
    } else {
        println!("{}", pricing.base().display());
    }
    if let Some(description) = &detail.description {
        println!();
        println!("{description}");
    }

    println!();
    let colors: Vec<String> = page
        .variants
        .colors()
        .iter()
        .map(|c| {
            let selected = page.variants.selected_color().is_some_and(|s| s.id == c.id);
            if selected {
                format!("[{}]", c.color)
            } else {
                c.color.clone()
            }
        })
        .collect();
    println!("Colors: {}", colors.join("  "));

    let sizes: Vec<String> = page
        .variants
        .size_slots()
        .into_iter()
        .map(|slot| {
            let label = if slot.size == page.variants.selected_size() {
                format!("[{}]", slot.size)
            } else {
                slot.size.to_string()
            };
            if slot.is_purchasable() {
                label
            } else {
                format!("{label}x")
            }
        })
        .collect();
    println!("Sizes:  {}", sizes.join("  "));

    if let Some(selection) = page.variants.selection_label() {
        println!("{selection}: {}", page.variants.availability().label());
    }
    println!(
        "Add to cart: {}",
        if page.variants.can_add_to_cart() {
            "available"
        } else {
            "unavailable"
        }
    );

    println!();
    match average_rating(&page.reviews) {
        Some(avg) => println!("Reviews ({avg} average)"),
        None => println!("No reviews yet."),
    }
    for review in &page.reviews {
        println!(
            "  {} by {}",
            review.rating.normalize(),
            review.author_name().unwrap_or("anonymous")
        );
        let scores: Vec<String> = review
            .sub_scores()
            .into_iter()
            .map(|(label, score)| format!("{label} {}", score.normalize()))
            .collect();
        if !scores.is_empty() {
            println!("    {}", scores.join(", "));
        }
        if let Some(comment) = &review.comment {
            println!("    {comment}");
        }
        for url in &review.image_urls {
            println!("    {url}");
        }
    }
    Ok(())
}
