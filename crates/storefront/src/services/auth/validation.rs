//! Account form validation.
//!
//! Every form is validated locally before anything is sent to the auth
//! service. A failed check blocks submission and yields the message shown
//! to the shopper.

use secrecy::SecretString;
use thiserror::Error;

use liftfit_core::Email;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Username length bounds (inclusive, after trimming).
pub const USERNAME_LENGTH: std::ops::RangeInclusive<usize> = 3..=20;

/// Characters that satisfy the "special character" password rule.
const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// A blocking form validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields required.")]
    AllFieldsRequired,
    #[error("Email and password fields required.")]
    EmailAndPasswordRequired,
    #[error("Email field required.")]
    EmailRequired,
    #[error("Username may only contain letters, numbers, and underscores.")]
    UsernameCharacters,
    #[error("Username must be between 3 and 20 characters.")]
    UsernameLength,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Password must be at least {} characters.", MIN_PASSWORD_LENGTH)]
    PasswordTooShort,
    #[error("Password must include at least one uppercase letter and one number.")]
    PasswordNeedsUppercaseAndDigit,
    #[error("Password must include at least one special character (e.g. !@#$%^&*).")]
    PasswordNeedsSpecialCharacter,
    #[error("Passwords do not match.")]
    PasswordMismatch,
}

// =============================================================================
// Sign up
// =============================================================================

/// Raw sign-up form input.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// A sign-up request that passed validation.
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub username: String,
    pub email: Email,
    pub password: SecretString,
}

impl SignUpForm {
    /// Validate the form, checking rules in the order shoppers see them.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<SignUpRequest, ValidationError> {
        if [
            &self.username,
            &self.email,
            &self.password,
            &self.confirm_password,
        ]
        .iter()
        .any(|field| field.is_empty())
        {
            return Err(ValidationError::AllFieldsRequired);
        }

        let username = validate_username(&self.username)?;
        let email = Email::parse(&self.email).map_err(|_| ValidationError::InvalidEmail)?;
        validate_password_strength(&self.password)?;

        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        Ok(SignUpRequest {
            username,
            email,
            password: SecretString::from(self.password.clone()),
        })
    }
}

fn validate_username(raw: &str) -> Result<String, ValidationError> {
    let username = raw.trim();
    let allowed = !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !allowed {
        return Err(ValidationError::UsernameCharacters);
    }
    if !USERNAME_LENGTH.contains(&username.len()) {
        return Err(ValidationError::UsernameLength);
    }
    Ok(username.to_string())
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_upper || !has_digit {
        return Err(ValidationError::PasswordNeedsUppercaseAndDigit);
    }
    if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        return Err(ValidationError::PasswordNeedsSpecialCharacter);
    }
    Ok(())
}

// =============================================================================
// Log in
// =============================================================================

/// Raw login form input.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// A login request that passed validation.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: Email,
    pub password: SecretString,
}

impl LoginForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns an error if either field is empty or the email is malformed.
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ValidationError::EmailAndPasswordRequired);
        }
        let email = Email::parse(&self.email).map_err(|_| ValidationError::InvalidEmail)?;
        Ok(LoginRequest {
            email,
            password: SecretString::from(self.password.clone()),
        })
    }
}

// =============================================================================
// Password recovery
// =============================================================================

/// Raw "forgot password" form input.
#[derive(Debug, Clone, Default)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl ForgotPasswordForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is empty or malformed.
    pub fn validate(&self) -> Result<Email, ValidationError> {
        if self.email.trim().is_empty() {
            return Err(ValidationError::EmailRequired);
        }
        Email::parse(&self.email).map_err(|_| ValidationError::InvalidEmail)
    }
}

/// Raw "reset password" form input, submitted from a recovery session.
#[derive(Debug, Clone, Default)]
pub struct ResetPasswordForm {
    pub password: String,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is empty or the passwords differ.
    pub fn validate(&self) -> Result<SecretString, ValidationError> {
        if self.password.is_empty() || self.confirm_password.is_empty() {
            return Err(ValidationError::AllFieldsRequired);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(SecretString::from(self.password.clone()))
    }
}
