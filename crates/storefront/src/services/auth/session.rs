//! Auth sessions.
//!
//! A [`Session`] is an explicit value handed to every user-scoped call.
//! Nothing in the library reads the signed-in user from ambient state.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use liftfit_core::UserId;

/// Refresh a session this long before it actually expires.
const REFRESH_MARGIN_SECS: i64 = 60;

/// The user as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    /// Auth user ID; also the primary key of the user's profile row.
    pub id: UserId,
    /// Email address on the account.
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form metadata supplied at sign-up (holds `username`).
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    /// Username captured at sign-up, if any.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.user_metadata.get("username")?.as_str()
    }
}

/// A signed-in session.
///
/// Implements `Debug` manually to redact tokens.
#[derive(Clone)]
pub struct Session {
    access_token: SecretString,
    refresh_token: SecretString,
    expires_at: DateTime<Utc>,
    user: AuthUser,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    /// Create a session from issued tokens.
    #[must_use]
    pub const fn new(
        access_token: SecretString,
        refresh_token: SecretString,
        expires_at: DateTime<Utc>,
        user: AuthUser,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at,
            user,
        }
    }

    /// Bearer token for API requests.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub(crate) fn refresh_token(&self) -> &str {
        self.refresh_token.expose_secret()
    }

    /// The signed-in user.
    #[must_use]
    pub const fn user(&self) -> &AuthUser {
        &self.user
    }

    /// Shortcut for the signed-in user's ID.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user.id
    }

    /// When the access token stops being accepted.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the access token has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the access token is close enough to expiry to refresh.
    #[must_use]
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) >= self.expires_at
    }
}
