//! Shared client state.

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::reviews::ReviewImages;
use crate::services::auth::AuthClient;
use crate::storage::PublicBucket;

/// Everything a screen or command needs to talk to the backend.
///
/// This struct is cheaply cloneable via `Arc`; clones share one HTTP
/// connection pool and lookup cache.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: BackendClient,
    auth: AuthClient,
    review_images: ReviewImages,
}

impl AppState {
    /// Create the shared state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, AppError> {
        let backend = BackendClient::new(&config.backend)?;
        let auth = AuthClient::new(&config.backend)?;
        let review_images = ReviewImages::new(PublicBucket::new(
            config.backend.url.clone(),
            config.review_images_bucket.clone(),
        ));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                auth,
                review_images,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Row API client; implements the catalog, wishlist and profile stores.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    #[must_use]
    pub fn review_images(&self) -> &ReviewImages {
        &self.inner.review_images
    }
}
