//! Hosted row API client.
//!
//! # Architecture
//!
//! - The backend is the source of truth: no local sync, direct API calls
//! - Queries are composed with [`Select`] and [`Filter`], then sent by [`BackendClient`]
//! - User-scoped calls take an explicit [`Session`]; without one the anonymous key is used
//! - Lookup tables (categories, types, styles) are cached in memory via `moka`
//!
//! # Example
//!
//! ```rust,ignore
//! use liftfit_storefront::backend::{BackendClient, Filter, Select};
//!
//! let client = BackendClient::new(&config.backend)?;
//!
//! let rows: Vec<Category> = client
//!     .select(&Select::from("product_categories"), None)
//!     .await?;
//! ```

mod cache;
mod catalog;
mod error;
mod profiles;
mod query;
mod wishlist;

pub use error::BackendError;
pub use query::{Direction, Filter, Select, filter_pairs};

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::services::auth::Session;
use crate::config::BackendConfig;

use cache::{CacheKey, CacheValue};

/// Maximum characters of a response body to include in logs.
const LOG_BODY_LIMIT: usize = 500;

/// Error body returned by the row API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the hosted row API.
///
/// Cheap to clone; all clones share one connection pool and cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    rest_endpoint: String,
    anon_key: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl BackendClient {
    /// Create a new row API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let rest_endpoint = format!("{}/rest/v1", config.url.as_str().trim_end_matches('/'));

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                rest_endpoint,
                anon_key: config.anon_key().to_string(),
                cache,
            }),
        })
    }

    fn request(&self, method: Method, table: &str, session: Option<&Session>) -> RequestBuilder {
        let bearer = session.map_or(self.inner.anon_key.as_str(), Session::access_token);
        self.inner
            .client
            .request(method, format!("{}/{table}", self.inner.rest_endpoint))
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(bearer)
    }

    /// Send a request and return the raw body of a successful response.
    async fn send(&self, request: RequestBuilder) -> Result<String, BackendError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        tracing::error!(
            status = %status,
            body = %body.chars().take(LOG_BODY_LIMIT).collect::<String>(),
            "Backend returned non-success status"
        );

        let parsed: Option<ApiErrorBody> = serde_json::from_str(&body).ok();
        let message = parsed
            .as_ref()
            .map(|b| {
                [b.message.as_deref(), b.details.as_deref(), b.hint.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| body.chars().take(200).collect());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(BackendError::Unauthorized(message))
            }
            StatusCode::NOT_FOUND => Err(BackendError::NotFound(message)),
            _ => Err(BackendError::Api {
                status: status.as_u16(),
                code: parsed.and_then(|b| b.code),
                message,
            }),
        }
    }

    fn parse<T: DeserializeOwned>(body: &str) -> Result<T, BackendError> {
        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(LOG_BODY_LIMIT).collect::<String>(),
                "Failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    // =========================================================================
    // Row operations
    // =========================================================================

    /// Fetch all rows matching a query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the rows cannot be parsed.
    #[instrument(skip_all, fields(table = %query.table()))]
    pub async fn select<T: DeserializeOwned>(
        &self,
        query: &Select,
        session: Option<&Session>,
    ) -> Result<Vec<T>, BackendError> {
        let request = self
            .request(Method::GET, query.table(), session)
            .query(&query.to_query_pairs());
        let body = self.send(request).await?;
        let rows: Vec<T> = Self::parse(&body)?;
        debug!(rows = rows.len(), "Fetched rows");
        Ok(rows)
    }

    /// Fetch at most one row. Zero rows is `Ok(None)`; several rows is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the row cannot be parsed, or
    /// more than one row matches.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        query: &Select,
        session: Option<&Session>,
    ) -> Result<Option<T>, BackendError> {
        let mut rows: Vec<T> = self.select(&query.clone().limit(2), session).await?;
        if rows.len() > 1 {
            return Err(BackendError::Api {
                status: 406,
                code: Some("PGRST116".to_string()),
                message: format!("expected at most one row from {}", query.table()),
            });
        }
        Ok(rows.pop())
    }

    /// Insert one row and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or no row is returned.
    #[instrument(skip_all, fields(table = %table))]
    pub async fn insert<B, T>(
        &self,
        table: &str,
        row: &B,
        session: Option<&Session>,
    ) -> Result<T, BackendError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::POST, table, session)
            .header("Prefer", "return=representation")
            .json(row);
        let body = self.send(request).await?;
        let rows: Vec<T> = Self::parse(&body)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(format!("insert into {table} returned no row")))
    }

    /// Update rows matching the filters and return them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the rows cannot be parsed.
    #[instrument(skip_all, fields(table = %table))]
    pub async fn update<B, T>(
        &self,
        table: &str,
        filters: &[Filter],
        changes: &B,
        session: Option<&Session>,
    ) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::PATCH, table, session)
            .query(&filter_pairs(filters))
            .header("Prefer", "return=representation")
            .json(changes);
        let body = self.send(request).await?;
        Self::parse(&body)
    }

    /// Delete rows matching the filters.
    ///
    /// An empty filter list is refused rather than deleting the whole table.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all, fields(table = %table))]
    pub async fn delete(
        &self,
        table: &str,
        filters: &[Filter],
        session: Option<&Session>,
    ) -> Result<(), BackendError> {
        if filters.is_empty() {
            return Err(BackendError::Api {
                status: 400,
                code: None,
                message: format!("refusing to delete from {table} without filters"),
            });
        }

        let request = self
            .request(Method::DELETE, table, session)
            .query(&filter_pairs(filters))
            .header("Prefer", "return=minimal");
        self.send(request).await?;
        Ok(())
    }
}

/// Deserialize `null` as the type's default (e.g., a null array as empty).
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
