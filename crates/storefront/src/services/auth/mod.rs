//! Authentication service.
//!
//! Validates account forms locally, then talks to the hosted auth API via
//! [`AuthApi`] ([`AuthClient`] in production). Sign-up also creates the
//! shopper's profile row.

mod client;
mod error;
mod session;
pub mod validation;

pub use client::{AuthApi, AuthClient, SignUpOutcome};
pub use error::AuthError;
pub use session::{AuthUser, Session};
pub use validation::{
    ForgotPasswordForm, LoginForm, ResetPasswordForm, SignUpForm, ValidationError,
};

use chrono::Utc;
use tracing::instrument;

use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::profile::{NewProfile, ProfileStore};

/// Authentication service.
///
/// Handles sign-up, login, logout and password recovery.
pub struct AuthService<'a, A, P> {
    client: &'a A,
    profiles: &'a P,
}

impl<'a, A: AuthApi, P: ProfileStore> AuthService<'a, A, P> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(client: &'a A, profiles: &'a P) -> Self {
        Self { client, profiles }
    }

    /// Register a new account and create its profile row.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the form is rejected locally.
    /// Returns `AuthError::UserAlreadyExists` if the email is registered.
    /// Returns `AuthError::Backend` if the profile row cannot be created.
    #[instrument(skip_all)]
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<SignUpOutcome, AuthError> {
        let request = form.validate()?;

        let outcome = self
            .client
            .sign_up(&request.email, &request.password, &request.username)
            .await?;

        let session = match &outcome {
            SignUpOutcome::SignedIn(session) => Some(session),
            SignUpOutcome::ConfirmationSent(_) => None,
        };

        let profile = NewProfile {
            id: outcome.user().id,
            username: request.username,
            email: request.email.into_inner(),
        };
        self.profiles
            .create_profile(session, &profile)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error creating profile row"))?;

        if let Some(session) = session {
            set_sentry_user(&session.user_id(), session.user().email.as_deref());
        }
        tracing::info!(user_id = %profile.id, "Account created");

        Ok(outcome)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the form is rejected locally.
    /// Returns `AuthError::InvalidCredentials` if the credentials are wrong.
    #[instrument(skip_all)]
    pub async fn login(&self, form: &LoginForm) -> Result<Session, AuthError> {
        let request = form.validate()?;
        let session = self
            .client
            .sign_in(&request.email, &request.password)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Login failed"))?;

        set_sentry_user(&session.user_id(), session.user().email.as_deref());
        add_breadcrumb("auth", "Signed in", None);
        Ok(session)
    }

    /// Sign out, revoking the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the auth service rejects the request.
    #[instrument(skip_all, fields(user_id = %session.user_id()))]
    pub async fn logout(&self, session: &Session) -> Result<(), AuthError> {
        self.client
            .sign_out(session)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error signing out"))?;

        clear_sentry_user();
        add_breadcrumb("auth", "Signed out", None);
        Ok(())
    }

    /// Email a password recovery link.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the form is rejected locally.
    #[instrument(skip_all)]
    pub async fn forgot_password(&self, form: &ForgotPasswordForm) -> Result<(), AuthError> {
        let email = form.validate()?;
        self.client.send_password_reset(&email).await
    }

    /// Set a new password from a signed-in or recovery session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the form is rejected locally.
    #[instrument(skip_all, fields(user_id = %session.user_id()))]
    pub async fn reset_password(
        &self,
        session: &Session,
        form: &ResetPasswordForm,
    ) -> Result<AuthUser, AuthError> {
        let password = form.validate()?;
        self.client.update_password(session, &password).await
    }

    /// Look up the signed-in user with the auth service, refreshing the
    /// session first when it is about to expire.
    ///
    /// Returns the session that was used alongside the user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionExpired` if the session was revoked.
    #[instrument(skip_all, fields(user_id = %session.user_id()))]
    pub async fn current_user(&self, session: Session) -> Result<(Session, AuthUser), AuthError> {
        let session = self.ensure_fresh(session).await?;
        let user = self
            .client
            .current_user(&session)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Session rejected"))?;
        Ok((session, user))
    }

    /// Return a session that is valid for at least another minute,
    /// refreshing it if necessary.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionExpired` if the refresh token was revoked.
    pub async fn ensure_fresh(&self, session: Session) -> Result<Session, AuthError> {
        if session.needs_refresh(Utc::now()) {
            tracing::debug!(user_id = %session.user_id(), "Refreshing session");
            self.client.refresh(&session).await
        } else {
            Ok(session)
        }
    }
}
