//! Backend error types.

use thiserror::Error;

/// Errors that can occur when talking to the hosted row API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the request.
    #[error("API error ({status}){}: {message}", format_code(.code.as_deref()))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Backend error code (e.g., `23505` for a unique violation).
        code: Option<String>,
        /// Human-readable message from the backend.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The session token was missing, expired or rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl BackendError {
    /// Whether this error is a unique-constraint violation.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Api { status, code, .. } => *status == 409 || code.as_deref() == Some("23505"),
            _ => false,
        }
    }
}

fn format_code(code: Option<&str>) -> String {
    code.map(|c| format!(" [{c}]")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_includes_code() {
        let err = BackendError::Api {
            status: 409,
            code: Some("23505".to_string()),
            message: "duplicate key value".to_string(),
        };
        assert_eq!(err.to_string(), "API error (409) [23505]: duplicate key value");
        assert!(err.is_conflict());
    }

    #[test]
    fn test_api_error_display_without_code() {
        let err = BackendError::Api {
            status: 500,
            code: None,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error (500): boom");
        assert!(!err.is_conflict());
    }
}
