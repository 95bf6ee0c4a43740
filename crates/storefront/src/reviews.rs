//! Product reviews.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;

use liftfit_core::{ProductId, ReviewId, UserId};

use crate::backend::null_as_default;
use crate::storage::PublicBucket;

/// Reviews shown on the product page.
pub const TOP_REVIEWS_LIMIT: u32 = 5;

/// Columns and joins requested for reviews.
pub const REVIEW_COLUMNS: &str = "*,profiles(username,avatar_url)";

/// Author columns joined from `profiles`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReviewAuthor {
    pub username: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A row in `reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub profile_id: UserId,
    pub product_id: ProductId,
    /// Overall rating.
    pub rating: Decimal,
    #[serde(default)]
    pub value: Option<Decimal>,
    #[serde(default)]
    pub quality: Option<Decimal>,
    #[serde(default)]
    pub comfort: Option<Decimal>,
    #[serde(default)]
    pub sizing: Option<Decimal>,
    #[serde(default)]
    pub aesthetic: Option<Decimal>,
    #[serde(default)]
    pub comment: Option<String>,
    /// Storage keys or absolute URLs; absolute after [`ReviewImages::resolve`].
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, rename = "profiles")]
    pub author: Option<ReviewAuthor>,
}

impl Review {
    /// The author's username, when the profile join returned one.
    #[must_use]
    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.username.as_str())
    }

    /// Named sub-scores that were recorded.
    #[must_use]
    pub fn sub_scores(&self) -> Vec<(&'static str, Decimal)> {
        [
            ("Value", self.value),
            ("Quality", self.quality),
            ("Comfort", self.comfort),
            ("Sizing", self.sizing),
            ("Aesthetic", self.aesthetic),
        ]
        .into_iter()
        .filter_map(|(label, score)| score.map(|s| (label, s)))
        .collect()
    }
}

/// Resolves review image keys against the review-images bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewImages {
    bucket: PublicBucket,
}

impl ReviewImages {
    #[must_use]
    pub const fn new(bucket: PublicBucket) -> Self {
        Self { bucket }
    }

    /// Replace storage keys with public URLs; absolute URLs are kept.
    #[must_use]
    pub fn resolve(&self, mut review: Review) -> Review {
        review.image_urls = review
            .image_urls
            .iter()
            .map(|key| self.bucket.object_url(key))
            .collect();
        review
    }

    #[must_use]
    pub fn resolve_all(&self, reviews: Vec<Review>) -> Vec<Review> {
        reviews.into_iter().map(|r| self.resolve(r)).collect()
    }
}

/// Mean overall rating to one decimal place, or `None` without reviews.
#[must_use]
pub fn average_rating(reviews: &[Review]) -> Option<Decimal> {
    if reviews.is_empty() {
        return None;
    }
    let total: Decimal = reviews.iter().map(|r| r.rating).sum();
    let mean = total / Decimal::from(reviews.len());
    Some(mean.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use url::Url;

    fn review(rating: Decimal, images: &[&str]) -> Review {
        serde_json::from_value(serde_json::json!({
            "id": "3d1f0f5a-8c44-4b43-9f43-6d3e2c1b0a99",
            "profile_id": "6f1c2b1e-8a4d-4c1b-9a57-0d2f1f6b8e11",
            "product_id": "0b8f9c3e-6a9e-4b55-a1e2-0c6d1b7a2f10",
            "rating": rating.to_string(),
            "value": 5,
            "quality": 4,
            "comfort": null,
            "comment": "Great squat shorts",
            "image_urls": images,
            "created_at": "2026-02-14T10:00:00Z",
            "profiles": { "username": "squat_sara", "avatar_url": null }
        }))
        .unwrap()
    }

    #[test]
    fn test_review_row_with_author() {
        let r = review(dec!(4.5), &[]);
        assert_eq!(r.author_name(), Some("squat_sara"));
        assert_eq!(r.sub_scores(), vec![("Value", dec!(5)), ("Quality", dec!(4))]);
    }

    #[test]
    fn test_image_keys_resolve_to_public_urls() {
        let images = ReviewImages::new(PublicBucket::new(
            Url::parse("https://abc123.supabase.co").unwrap(),
            "review-images",
        ));
        let resolved = images.resolve(review(
            dec!(5),
            &["u1/pic 1.jpg", "https://cdn.example.com/x.jpg"],
        ));
        assert_eq!(
            resolved.image_urls[0],
            "https://abc123.supabase.co/storage/v1/object/public/review-images/u1/pic%201.jpg"
        );
        assert_eq!(resolved.image_urls[1], "https://cdn.example.com/x.jpg");
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), None);
        let reviews = [review(dec!(5), &[]), review(dec!(4), &[]), review(dec!(4), &[])];
        assert_eq!(average_rating(&reviews), Some(dec!(4.3)));
    }
}
