//! Hosted auth API client.
//!
//! Talks to the `/auth/v1` endpoints: password grant, refresh grant,
//! sign-up, logout, recovery email, and the current-user resource.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::instrument;

use liftfit_core::Email;

use super::AuthError;
use super::session::{AuthUser, Session};
use crate::config::BackendConfig;

/// Token grant response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    /// Token lifetime in seconds.
    expires_in: i64,
    /// Absolute expiry as a Unix timestamp, when the service provides it.
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self, issued_at: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .unwrap_or_else(|| issued_at + Duration::seconds(self.expires_in));
        Session::new(
            SecretString::from(self.access_token),
            SecretString::from(self.refresh_token),
            expires_at,
            self.user,
        )
    }
}

/// Sign-up returns a session when email confirmation is disabled, or just
/// the pending user when a confirmation email was sent.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(AuthUser),
}

/// Result of a successful sign-up.
#[derive(Debug)]
pub enum SignUpOutcome {
    /// A confirmation link was emailed; the user must verify, then log in.
    ConfirmationSent(AuthUser),
    /// The account is active and already signed in.
    SignedIn(Session),
}

impl SignUpOutcome {
    /// The new user, either way.
    #[must_use]
    pub const fn user(&self) -> &AuthUser {
        match self {
            Self::ConfirmationSent(user) => user,
            Self::SignedIn(session) => session.user(),
        }
    }
}

/// Error body from the auth service. Older and newer deployments use
/// different field names.
#[derive(Debug, Default, Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl AuthErrorBody {
    fn message(&self) -> String {
        self.msg
            .clone()
            .or_else(|| self.error_description.clone())
            .or_else(|| self.message.clone())
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }

    fn into_error(self, status: StatusCode) -> AuthError {
        let code = self.error_code.as_deref().or(self.error.as_deref());
        match code {
            Some("invalid_credentials" | "invalid_grant") => AuthError::InvalidCredentials,
            Some("email_not_confirmed") => AuthError::EmailNotConfirmed,
            Some("user_already_exists" | "email_exists") => AuthError::UserAlreadyExists,
            Some("session_not_found" | "refresh_token_not_found" | "bad_jwt") => {
                AuthError::SessionExpired
            }
            _ if status == StatusCode::UNAUTHORIZED => AuthError::SessionExpired,
            _ => AuthError::Service {
                status: status.as_u16(),
                message: self.message(),
            },
        }
    }
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpMetadata<'a>,
}

#[derive(Serialize)]
struct SignUpMetadata<'a> {
    username: &'a str,
}

#[derive(Serialize)]
struct RecoverBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct UpdateUserBody<'a> {
    password: &'a str,
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth Client
// ─────────────────────────────────────────────────────────────────────────────

/// Calls to the hosted auth API.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange an email and password for a session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the credentials are wrong.
    async fn sign_in(&self, email: &Email, password: &SecretString) -> Result<Session, AuthError>;

    /// Register a new account, storing the username as user metadata.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the email is registered.
    async fn sign_up(
        &self,
        email: &Email,
        password: &SecretString,
        username: &str,
    ) -> Result<SignUpOutcome, AuthError>;

    /// Exchange a refresh token for a new session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionExpired` if the refresh token was revoked.
    async fn refresh(&self, session: &Session) -> Result<Session, AuthError>;

    /// Revoke the session.
    async fn sign_out(&self, session: &Session) -> Result<(), AuthError>;

    /// Fetch the user behind a session, validating it with the service.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionExpired` if the token is no longer accepted.
    async fn current_user(&self, session: &Session) -> Result<AuthUser, AuthError>;

    /// Email a password recovery link.
    async fn send_password_reset(&self, email: &Email) -> Result<(), AuthError>;

    /// Set a new password for the signed-in (or recovering) user.
    async fn update_password(
        &self,
        session: &Session,
        password: &SecretString,
    ) -> Result<AuthUser, AuthError>;
}

/// Client for the hosted auth API.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    client: reqwest::Client,
    endpoint: String,
    anon_key: String,
}

impl AuthClient {
    /// Create a new auth API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(AuthClientInner {
                client,
                endpoint: format!("{}/auth/v1", config.url.as_str().trim_end_matches('/')),
                anon_key: config.anon_key().to_string(),
            }),
        })
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.inner
            .client
            .post(format!("{}/{path}", self.inner.endpoint))
            .header("apikey", &self.inner.anon_key)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AuthError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        let error_body: AuthErrorBody = serde_json::from_str(&body).unwrap_or_default();
        let err = error_body.into_error(status);
        tracing::warn!(status = %status, error = %err, "Auth service rejected request");
        Err(err)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), AuthError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let error_body: AuthErrorBody = serde_json::from_str(&body).unwrap_or_default();
        Err(error_body.into_error(status))
    }
}

#[async_trait]
impl AuthApi for AuthClient {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Session, AuthError> {
        let issued_at = Utc::now();
        let request = self.post("token").query(&[("grant_type", "password")]).json(
            &PasswordGrant {
                email: email.as_str(),
                password: password.expose_secret(),
            },
        );
        let token: TokenResponse = self.send(request).await?;
        Ok(token.into_session(issued_at))
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_up(
        &self,
        email: &Email,
        password: &SecretString,
        username: &str,
    ) -> Result<SignUpOutcome, AuthError> {
        let issued_at = Utc::now();
        let request = self.post("signup").json(&SignUpBody {
            email: email.as_str(),
            password: password.expose_secret(),
            data: SignUpMetadata { username },
        });
        let response: SignUpResponse = self.send(request).await?;
        Ok(match response {
            SignUpResponse::Session(token) => SignUpOutcome::SignedIn(token.into_session(issued_at)),
            SignUpResponse::User(user) => SignUpOutcome::ConfirmationSent(user),
        })
    }

    #[instrument(skip_all, fields(user_id = %session.user_id()))]
    async fn refresh(&self, session: &Session) -> Result<Session, AuthError> {
        let issued_at = Utc::now();
        let request = self
            .post("token")
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshGrant {
                refresh_token: session.refresh_token(),
            });
        let token: TokenResponse = self.send(request).await?;
        Ok(token.into_session(issued_at))
    }

    #[instrument(skip_all, fields(user_id = %session.user_id()))]
    async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        let request = self.post("logout").bearer_auth(session.access_token());
        self.send_empty(request).await
    }

    #[instrument(skip_all, fields(user_id = %session.user_id()))]
    async fn current_user(&self, session: &Session) -> Result<AuthUser, AuthError> {
        let request = self
            .inner
            .client
            .get(format!("{}/user", self.inner.endpoint))
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(session.access_token());
        self.send(request).await
    }

    #[instrument(skip(self), fields(email = %email))]
    async fn send_password_reset(&self, email: &Email) -> Result<(), AuthError> {
        let request = self.post("recover").json(&RecoverBody {
            email: email.as_str(),
        });
        self.send_empty(request).await
    }

    #[instrument(skip_all, fields(user_id = %session.user_id()))]
    async fn update_password(
        &self,
        session: &Session,
        password: &SecretString,
    ) -> Result<AuthUser, AuthError> {
        let request = self
            .inner
            .client
            .put(format!("{}/user", self.inner.endpoint))
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(session.access_token())
            .json(&UpdateUserBody {
                password: password.expose_secret(),
            });
        self.send(request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const USER_ID: &str = "6f1c2b1e-8a4d-4c1b-9a57-0d2f1f6b8e11";

    #[test]
    fn test_token_response_prefers_absolute_expiry() {
        let token: TokenResponse = serde_json::from_value(serde_json::json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3600,
            "expires_at": 1_900_000_000,
            "user": { "id": USER_ID }
        }))
        .unwrap();
        let session = token.into_session(Utc::now());
        assert_eq!(session.expires_at().timestamp(), 1_900_000_000);
    }

    #[test]
    fn test_token_response_falls_back_to_lifetime() {
        let token: TokenResponse = serde_json::from_value(serde_json::json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3600,
            "user": { "id": USER_ID }
        }))
        .unwrap();
        let issued_at = DateTime::from_timestamp(1_000_000, 0).unwrap();
        let session = token.into_session(issued_at);
        assert_eq!(session.expires_at().timestamp(), 1_003_600);
    }

    #[test]
    fn test_sign_up_response_variants() {
        let pending: SignUpResponse = serde_json::from_value(serde_json::json!({
            "id": USER_ID,
            "email": "m@gym.io",
            "user_metadata": { "username": "iron_mike" }
        }))
        .unwrap();
        assert!(matches!(pending, SignUpResponse::User(_)));

        let active: SignUpResponse = serde_json::from_value(serde_json::json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3600,
            "user": { "id": USER_ID }
        }))
        .unwrap();
        assert!(matches!(active, SignUpResponse::Session(_)));
    }

    #[test]
    fn test_error_body_mapping() {
        let body: AuthErrorBody = serde_json::from_value(serde_json::json!({
            "code": 400,
            "error_code": "invalid_credentials",
            "msg": "Invalid login credentials"
        }))
        .unwrap();
        assert!(matches!(
            body.into_error(StatusCode::BAD_REQUEST),
            AuthError::InvalidCredentials
        ));

        let legacy: AuthErrorBody = serde_json::from_value(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        }))
        .unwrap();
        assert!(matches!(
            legacy.into_error(StatusCode::BAD_REQUEST),
            AuthError::InvalidCredentials
        ));

        let unknown = AuthErrorBody {
            msg: Some("Signups not allowed".to_string()),
            ..AuthErrorBody::default()
        };
        match unknown.into_error(StatusCode::UNPROCESSABLE_ENTITY) {
            AuthError::Service { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Signups not allowed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unauthorized_without_code_is_session_expired() {
        assert!(matches!(
            AuthErrorBody::default().into_error(StatusCode::UNAUTHORIZED),
            AuthError::SessionExpired
        ));
    }
}
