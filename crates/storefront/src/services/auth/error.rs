//! Authentication error types.

use thiserror::Error;

use crate::backend::BackendError;

use super::validation::ValidationError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Form input failed validation; nothing was submitted.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Invalid credentials (wrong password or unknown email).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but its email address has not been confirmed.
    #[error("email not confirmed")]
    EmailNotConfirmed,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// The session expired or was revoked.
    #[error("session expired")]
    SessionExpired,

    /// The auth service rejected the request.
    #[error("auth service error ({status}): {message}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Message from the auth service.
        message: String,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Row API error while maintaining the profile row.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}
