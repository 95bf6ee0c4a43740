//! Integration tests for the LiftFit storefront library.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p liftfit-integration-tests
//! ```
//!
//! The tests drive the storefront screens against [`FakeBackend`], an
//! in-memory store that implements the same catalog, wishlist and profile
//! traits as the hosted backend client, and [`FakeAuth`], an in-memory auth
//! service. Filtering, sorting and paging follow
//! the row API's semantics so paging and filter behavior can be exercised
//! end to end without a network.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};

use liftfit_core::{
    CategoryId, ColorId, Email, NewsId, ProductId, ReviewId, Size, StockId, StyleId, TypeId, UserId,
    WishlistId,
};
use liftfit_storefront::auth::{AuthApi, AuthError, AuthUser, Session, SignUpOutcome};
use liftfit_storefront::backend::BackendError;
use liftfit_storefront::catalog::{
    CatalogSource, Category, NewsPost, ProductQuery, ProductSummary, ProductType, SortOrder,
    Style,
};
use liftfit_storefront::product::{NameRef, ProductColor, ProductDetail, ProductStock};
use liftfit_storefront::profile::{NewProfile, Profile, ProfileStore};
use liftfit_storefront::reviews::Review;
use liftfit_storefront::wishlist::{
    WishlistColor, WishlistEntry, WishlistKey, WishlistProduct, WishlistStock, WishlistStore,
};

/// Operations the fake backend should fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Failures {
    /// Product listing queries.
    pub products: bool,
    /// Category, type and style lookups.
    pub lookups: bool,
    /// Stock rows for product pages.
    pub stocks: bool,
    /// Review queries.
    pub reviews: bool,
    /// Wishlist membership lookups.
    pub wishlist_reads: bool,
    /// Wishlist inserts and deletes.
    pub wishlist_writes: bool,
}

#[derive(Debug, Clone)]
struct WishlistRow {
    id: WishlistId,
    key: WishlistKey,
}

#[derive(Default)]
struct State {
    products: Vec<ProductSummary>,
    categories: Vec<Category>,
    product_types: Vec<ProductType>,
    styles: Vec<Style>,
    colors: Vec<ProductColor>,
    stocks: Vec<ProductStock>,
    reviews: Vec<Review>,
    news: Vec<NewsPost>,
    wishlist: Vec<WishlistRow>,
    profiles: Vec<Profile>,
    product_queries: Vec<ProductQuery>,
    failures: Failures,
}

/// In-memory backend.
///
/// Cheap to clone; clones share one store so a test can keep a handle while
/// a screen owns another.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<Mutex<State>>,
}

impl FakeBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_failures(&self, failures: Failures) {
        self.state().failures = failures;
    }

    pub fn add_product(&self, product: ProductSummary) {
        self.state().products.push(product);
    }

    pub fn add_category(&self, id: i32, name: &str) -> CategoryId {
        let id = CategoryId::new(id);
        self.state().categories.push(Category {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn add_type(&self, id: i32, name: &str, category: CategoryId) -> TypeId {
        let id = TypeId::new(id);
        self.state().product_types.push(ProductType {
            id,
            name: name.to_string(),
            category_id: Some(category),
        });
        id
    }

    pub fn add_style(&self, name: &str) -> StyleId {
        let id = StyleId::random();
        self.state().styles.push(Style {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn add_color(&self, product: ProductId, color: &str) -> ColorId {
        let id = ColorId::random();
        self.state().colors.push(ProductColor {
            id,
            product_id: product,
            color: color.to_string(),
            hex: String::new(),
            image_urls: vec![format!("https://cdn.example.com/{color}.jpg")],
        });
        id
    }

    pub fn add_stock(&self, color: ColorId, size: Size, stock: i32) -> StockId {
        let id = StockId::random();
        self.state().stocks.push(ProductStock {
            id,
            product_color_id: color,
            size: size.label().to_string(),
            stock,
        });
        id
    }

    pub fn add_review(&self, product: ProductId, rating: Decimal, image_urls: &[&str]) {
        self.state().reviews.push(Review {
            id: ReviewId::random(),
            profile_id: UserId::random(),
            product_id: product,
            rating,
            value: None,
            quality: None,
            comfort: None,
            sizing: None,
            aesthetic: None,
            comment: Some(format!("Rated {rating}")),
            image_urls: image_urls.iter().map(ToString::to_string).collect(),
            created_at: fixed_now(),
            author: None,
        });
    }

    pub fn add_news(&self, id: i32, title: &str, created_at: DateTime<Utc>) {
        self.state().news.push(NewsPost {
            id: NewsId::new(id),
            title: title.to_string(),
            content: None,
            background_url: None,
            created_at,
        });
    }

    /// Every product query received, oldest first.
    #[must_use]
    pub fn product_queries(&self) -> Vec<ProductQuery> {
        self.state().product_queries.clone()
    }

    /// Wishlist rows stored for any user.
    #[must_use]
    pub fn wishlist_len(&self) -> usize {
        self.state().wishlist.len()
    }

    #[must_use]
    pub fn profile_for(&self, user: UserId) -> Option<Profile> {
        self.state().profiles.iter().find(|p| p.id == user).cloned()
    }
}

fn unavailable(what: &str) -> BackendError {
    BackendError::Api {
        status: 503,
        code: None,
        message: format!("{what} unavailable"),
    }
}

fn facet<T: Ord>(selected: &BTreeSet<T>, value: Option<T>) -> bool {
    selected.is_empty() || value.is_some_and(|v| selected.contains(&v))
}

fn matches(product: &ProductSummary, query: &ProductQuery) -> bool {
    let f = &query.filters;
    facet(&f.categories, product.category_id)
        && facet(&f.types, product.type_id)
        && facet(&f.styles, product.style_id)
        && facet(&f.genders, product.gender)
        && (!f.on_sale || product.discount.is_some_and(|d| d > Decimal::ZERO && d < Decimal::ONE))
        && (!f.new_arrivals || product.created_at >= query.new_arrivals_since())
        && f.search_term().is_none_or(|term| {
            product
                .name
                .to_lowercase()
                .contains(&term.to_lowercase())
        })
}

fn sort(products: &mut [ProductSummary], order: SortOrder) {
    products.sort_by(|a, b| {
        let primary = match order {
            SortOrder::PriceAsc => a.price.cmp(&b.price),
            SortOrder::PriceDesc => b.price.cmp(&a.price),
            SortOrder::CreatedAsc => a.created_at.cmp(&b.created_at),
            SortOrder::CreatedDesc => b.created_at.cmp(&a.created_at),
            SortOrder::NameAsc => a.name.cmp(&b.name),
            SortOrder::NameDesc => b.name.cmp(&a.name),
        };
        primary.then_with(|| a.id.as_uuid().cmp(&b.id.as_uuid()))
    });
}

fn to_usize(n: u32) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

#[async_trait]
impl CatalogSource for FakeBackend {
    async fn products(&self, query: &ProductQuery) -> Result<Vec<ProductSummary>, BackendError> {
        let mut state = self.state();
        state.product_queries.push(query.clone());
        if state.failures.products {
            return Err(unavailable("products"));
        }

        let mut rows: Vec<ProductSummary> = state
            .products
            .iter()
            .filter(|p| matches(p, query))
            .cloned()
            .collect();
        sort(&mut rows, query.filters.sort);

        let page_size = to_usize(query.page_size);
        Ok(rows
            .into_iter()
            .skip(to_usize(query.page).saturating_mul(page_size))
            .take(page_size)
            .collect())
    }

    async fn all_products(&self) -> Result<Vec<ProductSummary>, BackendError> {
        let state = self.state();
        if state.failures.products {
            return Err(unavailable("products"));
        }
        Ok(state.products.clone())
    }

    async fn categories(&self) -> Result<Vec<Category>, BackendError> {
        let state = self.state();
        if state.failures.lookups {
            return Err(unavailable("categories"));
        }
        Ok(state.categories.clone())
    }

    async fn product_types(&self) -> Result<Vec<ProductType>, BackendError> {
        let state = self.state();
        if state.failures.lookups {
            return Err(unavailable("product types"));
        }
        Ok(state.product_types.clone())
    }

    async fn styles(&self) -> Result<Vec<Style>, BackendError> {
        let state = self.state();
        if state.failures.lookups {
            return Err(unavailable("styles"));
        }
        Ok(state.styles.clone())
    }

    async fn product(&self, id: ProductId) -> Result<Option<ProductDetail>, BackendError> {
        let state = self.state();
        let Some(p) = state.products.iter().find(|p| p.id == id) else {
            return Ok(None);
        };

        let category = state
            .categories
            .iter()
            .find(|c| Some(c.id) == p.category_id)
            .map(|c| NameRef {
                name: c.name.clone(),
            });
        let product_type = state
            .product_types
            .iter()
            .find(|t| Some(t.id) == p.type_id)
            .map(|t| NameRef {
                name: t.name.clone(),
            });
        let style = state
            .styles
            .iter()
            .find(|s| Some(s.id) == p.style_id)
            .map(|s| NameRef {
                name: s.name.clone(),
            });

        Ok(Some(ProductDetail {
            id: p.id,
            name: p.name.clone(),
            description: p.description.clone(),
            price: p.price,
            discount: p.discount,
            category_id: p.category_id,
            type_id: p.type_id,
            style_id: p.style_id,
            gender: p.gender,
            created_at: p.created_at,
            image_urls: p.image_urls.clone(),
            category,
            product_type,
            style,
        }))
    }

    async fn colors(&self, product: ProductId) -> Result<Vec<ProductColor>, BackendError> {
        Ok(self
            .state()
            .colors
            .iter()
            .filter(|c| c.product_id == product)
            .cloned()
            .collect())
    }

    async fn stocks(&self, colors: &[ColorId]) -> Result<Vec<ProductStock>, BackendError> {
        let state = self.state();
        if state.failures.stocks {
            return Err(unavailable("stock"));
        }
        Ok(state
            .stocks
            .iter()
            .filter(|s| colors.contains(&s.product_color_id))
            .cloned()
            .collect())
    }

    async fn top_reviews(
        &self,
        product: ProductId,
        limit: u32,
    ) -> Result<Vec<Review>, BackendError> {
        let state = self.state();
        if state.failures.reviews {
            return Err(unavailable("reviews"));
        }
        let mut rows: Vec<Review> = state
            .reviews
            .iter()
            .filter(|r| r.product_id == product)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.rating.cmp(&a.rating));
        rows.truncate(to_usize(limit));
        Ok(rows)
    }

    async fn latest_news(&self, limit: u32) -> Result<Vec<NewsPost>, BackendError> {
        let mut rows = self.state().news.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(to_usize(limit));
        Ok(rows)
    }
}

#[async_trait]
impl WishlistStore for FakeBackend {
    async fn find(
        &self,
        _session: &Session,
        key: &WishlistKey,
    ) -> Result<Option<WishlistId>, BackendError> {
        let state = self.state();
        if state.failures.wishlist_reads {
            return Err(unavailable("wishlist"));
        }
        Ok(state
            .wishlist
            .iter()
            .find(|row| row.key == *key)
            .map(|row| row.id))
    }

    async fn insert(
        &self,
        _session: &Session,
        key: &WishlistKey,
    ) -> Result<WishlistId, BackendError> {
        let mut state = self.state();
        if state.failures.wishlist_writes {
            return Err(unavailable("wishlist"));
        }
        let id = WishlistId::random();
        state.wishlist.push(WishlistRow { id, key: *key });
        Ok(id)
    }

    async fn delete(&self, _session: &Session, id: WishlistId) -> Result<(), BackendError> {
        let mut state = self.state();
        if state.failures.wishlist_writes {
            return Err(unavailable("wishlist"));
        }
        state.wishlist.retain(|row| row.id != id);
        Ok(())
    }

    async fn entries(&self, session: &Session) -> Result<Vec<WishlistEntry>, BackendError> {
        let state = self.state();
        let mut entries: Vec<WishlistEntry> = state
            .wishlist
            .iter()
            .filter(|row| row.key.user == session.user_id())
            .map(|row| WishlistEntry {
                id: row.id,
                profile_id: row.key.user,
                product_id: row.key.product,
                product_color_id: row.key.color,
                product_stock_id: row.key.stock,
                product: state
                    .products
                    .iter()
                    .find(|p| p.id == row.key.product)
                    .map(|p| WishlistProduct {
                        id: p.id,
                        name: p.name.clone(),
                        price: p.price,
                        discount: p.discount,
                    }),
                color: state
                    .colors
                    .iter()
                    .find(|c| Some(c.id) == row.key.color)
                    .map(|c| WishlistColor {
                        color: c.color.clone(),
                        hex: c.hex.clone(),
                        image_urls: c.image_urls.clone(),
                    }),
                stock: state
                    .stocks
                    .iter()
                    .find(|s| Some(s.id) == row.key.stock)
                    .map(|s| WishlistStock {
                        size: s.size.clone(),
                        stock: s.stock,
                    }),
            })
            .collect();
        // Descending order puts rows without a stock join first.
        entries.sort_by(|a, b| {
            let stock = |e: &WishlistEntry| e.stock.as_ref().map_or(i32::MAX, |s| s.stock);
            stock(b).cmp(&stock(a))
        });
        Ok(entries)
    }
}

#[async_trait]
impl ProfileStore for FakeBackend {
    async fn profile(&self, session: &Session) -> Result<Option<Profile>, BackendError> {
        Ok(self.profile_for(session.user_id()))
    }

    async fn create_profile(
        &self,
        _session: Option<&Session>,
        profile: &NewProfile,
    ) -> Result<Profile, BackendError> {
        let row = Profile {
            id: profile.id,
            username: profile.username.clone(),
            email: Some(profile.email.clone()),
            avatar_url: None,
            created_at: Some(fixed_now()),
        };
        self.state().profiles.push(row.clone());
        Ok(row)
    }
}

// =============================================================================
// Auth
// =============================================================================

struct Account {
    email: String,
    password: String,
    user: AuthUser,
}

#[derive(Default)]
struct AuthState {
    accounts: Vec<Account>,
    confirm_email: bool,
    requests: usize,
    refreshes: usize,
}

/// In-memory auth service.
///
/// Sessions it issues expire an hour after they are created.
#[derive(Clone, Default)]
pub struct FakeAuth {
    inner: Arc<Mutex<AuthState>>,
}

impl FakeAuth {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, AuthState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make sign-up email a confirmation link instead of signing in.
    pub fn require_confirmation(&self) {
        self.state().confirm_email = true;
    }

    /// Requests received by the service.
    #[must_use]
    pub fn requests(&self) -> usize {
        self.state().requests
    }

    /// Refresh grants received by the service.
    #[must_use]
    pub fn refreshes(&self) -> usize {
        self.state().refreshes
    }
}

fn issue_session(user: AuthUser, expires_at: DateTime<Utc>) -> Session {
    Session::new(
        SecretString::from(format!("access-{}", user.id)),
        SecretString::from(format!("refresh-{}", user.id)),
        expires_at,
        user,
    )
}

#[async_trait]
impl AuthApi for FakeAuth {
    async fn sign_in(&self, email: &Email, password: &SecretString) -> Result<Session, AuthError> {
        let mut state = self.state();
        state.requests += 1;
        let user = state
            .accounts
            .iter()
            .find(|a| a.email == email.as_str() && a.password == password.expose_secret())
            .map(|a| a.user.clone())
            .ok_or(AuthError::InvalidCredentials)?;
        Ok(issue_session(user, Utc::now() + Duration::hours(1)))
    }

    async fn sign_up(
        &self,
        email: &Email,
        password: &SecretString,
        username: &str,
    ) -> Result<SignUpOutcome, AuthError> {
        let mut state = self.state();
        state.requests += 1;
        if state.accounts.iter().any(|a| a.email == email.as_str()) {
            return Err(AuthError::UserAlreadyExists);
        }

        let user = AuthUser {
            id: UserId::random(),
            email: Some(email.as_str().to_string()),
            user_metadata: serde_json::json!({ "username": username }),
        };
        state.accounts.push(Account {
            email: email.as_str().to_string(),
            password: password.expose_secret().to_string(),
            user: user.clone(),
        });

        Ok(if state.confirm_email {
            SignUpOutcome::ConfirmationSent(user)
        } else {
            SignUpOutcome::SignedIn(issue_session(user, Utc::now() + Duration::hours(1)))
        })
    }

    async fn refresh(&self, session: &Session) -> Result<Session, AuthError> {
        let mut state = self.state();
        state.requests += 1;
        state.refreshes += 1;
        Ok(issue_session(
            session.user().clone(),
            Utc::now() + Duration::hours(1),
        ))
    }

    async fn sign_out(&self, _session: &Session) -> Result<(), AuthError> {
        self.state().requests += 1;
        Ok(())
    }

    async fn current_user(&self, session: &Session) -> Result<AuthUser, AuthError> {
        self.state().requests += 1;
        if session.is_expired(Utc::now()) {
            return Err(AuthError::SessionExpired);
        }
        Ok(session.user().clone())
    }

    async fn send_password_reset(&self, _email: &Email) -> Result<(), AuthError> {
        self.state().requests += 1;
        Ok(())
    }

    async fn update_password(
        &self,
        session: &Session,
        password: &SecretString,
    ) -> Result<AuthUser, AuthError> {
        let mut state = self.state();
        state.requests += 1;
        let account = state
            .accounts
            .iter_mut()
            .find(|a| a.user.id == session.user_id())
            .ok_or(AuthError::SessionExpired)?;
        account.password = password.expose_secret().to_string();
        Ok(account.user.clone())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A fixed point in time for fixtures.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-06-01T12:00:00Z")
        .map_or_else(|_| Utc::now(), |t| t.with_timezone(&Utc))
}

/// A product created `age_days` before now.
#[must_use]
pub fn product(name: &str, price: Decimal, age_days: i64) -> ProductSummary {
    ProductSummary {
        id: ProductId::random(),
        name: name.to_string(),
        description: None,
        price,
        discount: None,
        category_id: None,
        type_id: None,
        style_id: None,
        gender: None,
        created_at: Utc::now() - Duration::days(age_days),
        image_urls: vec![format!("https://cdn.example.com/{name}.jpg")],
    }
}

/// A signed-in session for `user`, valid for an hour.
#[must_use]
pub fn session_for(user: UserId) -> Session {
    Session::new(
        SecretString::from("test-access-token"),
        SecretString::from("test-refresh-token"),
        Utc::now() + Duration::hours(1),
        AuthUser {
            id: user,
            email: Some("lifter@example.com".to_string()),
            user_metadata: serde_json::json!({ "username": "lifter" }),
        },
    )
}

/// Review image resolver for a test project.
#[must_use]
pub fn review_images() -> liftfit_storefront::reviews::ReviewImages {
    let base = url::Url::parse("https://test-project.supabase.co")
        .unwrap_or_else(|_| unreachable!("fixture URL is valid"));
    liftfit_storefront::reviews::ReviewImages::new(liftfit_storefront::storage::PublicBucket::new(
        base,
        "review-images",
    ))
}
