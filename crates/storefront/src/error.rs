//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for callers that drive whole screens
//! or commands. [`AppError::report`] captures server-side failures to Sentry
//! and [`AppError::user_message`] is safe to show to shoppers.

use thiserror::Error;

use crate::backend::BackendError;
use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::wishlist::WishlistError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Row API operation failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Wishlist operation failed.
    #[error("Wishlist error: {0}")]
    Wishlist(#[from] WishlistError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this is a failure on our side or the backend's, rather than
    /// something the shopper did.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::Config(_) | Self::Backend(_) => true,
            Self::Wishlist(WishlistError::Backend(_)) => true,
            Self::Auth(err) => matches!(
                err,
                AuthError::Service { .. }
                    | AuthError::Http(_)
                    | AuthError::Parse(_)
                    | AuthError::Backend(_)
            ),
            _ => false,
        }
    }

    /// Log the error, capturing server-side failures to Sentry.
    pub fn report(&self) {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }
    }

    /// Message safe to show to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(_) => "Something went wrong. Please try again.".to_string(),
            Self::Backend(BackendError::RateLimited(_)) => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            Self::Backend(BackendError::Unauthorized(_)) => "Please log in again.".to_string(),
            Self::Backend(_) | Self::Wishlist(WishlistError::Backend(_)) => {
                "We couldn't reach the store. Please try again.".to_string()
            }
            Self::Wishlist(WishlistError::NoSelection) => "Select a product first.".to_string(),
            Self::Wishlist(WishlistError::WrongUser) => {
                "Please log in to continue.".to_string()
            }
            Self::Auth(err) => match err {
                AuthError::Validation(e) => e.to_string(),
                AuthError::InvalidCredentials => "Invalid login credentials.".to_string(),
                AuthError::EmailNotConfirmed => {
                    "Please confirm your email address, then log in.".to_string()
                }
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists.".to_string()
                }
                AuthError::SessionExpired => "Your session expired. Please log in again.".to_string(),
                _ => "Authentication error. Please try again.".to_string(),
            },
            Self::NotFound(what) => format!("{what} not found."),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("wishlist", "Added to wishlist", Some(&[("product_id", "9b2f…")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::ValidationError;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Product".to_string());
        assert_eq!(err.to_string(), "Not found: Product");
        assert_eq!(err.user_message(), "Product not found.");
    }

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let err = AppError::from(AuthError::from(ValidationError::PasswordMismatch));
        assert_eq!(err.user_message(), "Passwords do not match.");
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_backend_details_are_hidden() {
        let err = AppError::from(BackendError::Api {
            status: 500,
            code: Some("XX000".to_string()),
            message: "relation \"products\" does not exist".to_string(),
        });
        assert!(err.is_server_error());
        assert!(!err.user_message().contains("relation"));
    }

    #[test]
    fn test_server_error_classification() {
        assert!(!AppError::Auth(AuthError::InvalidCredentials).is_server_error());
        assert!(!AppError::Wishlist(WishlistError::NoSelection).is_server_error());
        assert!(AppError::from(BackendError::RateLimited(30)).is_server_error());
        assert!(
            AppError::Auth(AuthError::Service {
                status: 500,
                message: "down".to_string()
            })
            .is_server_error()
        );
    }
}
