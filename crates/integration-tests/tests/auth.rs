//! Account flows: sign-up with profile creation, login and session upkeep.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, Utc};
use secrecy::SecretString;

use liftfit_integration_tests::{FakeAuth, FakeBackend};
use liftfit_storefront::auth::{
    AuthError, AuthService, AuthUser, LoginForm, Session, SignUpForm, SignUpOutcome,
    ValidationError,
};

fn sign_up_form() -> SignUpForm {
    SignUpForm {
        username: " squat_sara ".to_string(),
        email: "Sara@Example.com".to_string(),
        password: "Str0ng!pass".to_string(),
        confirm_password: "Str0ng!pass".to_string(),
    }
}

#[tokio::test]
async fn test_sign_up_creates_profile_for_signed_in_user() {
    let auth = FakeAuth::new();
    let backend = FakeBackend::new();
    let service = AuthService::new(&auth, &backend);

    let outcome = service.sign_up(&sign_up_form()).await.unwrap();
    let SignUpOutcome::SignedIn(session) = &outcome else {
        panic!("expected a session, got {outcome:?}");
    };

    let profile = backend.profile_for(session.user_id()).unwrap();
    assert_eq!(profile.username, "squat_sara");
    assert_eq!(profile.email.as_deref(), Some("sara@example.com"));
}

#[tokio::test]
async fn test_sign_up_creates_profile_when_confirmation_is_pending() {
    let auth = FakeAuth::new();
    auth.require_confirmation();
    let backend = FakeBackend::new();
    let service = AuthService::new(&auth, &backend);

    let outcome = service.sign_up(&sign_up_form()).await.unwrap();
    assert!(matches!(outcome, SignUpOutcome::ConfirmationSent(_)));

    let profile = backend.profile_for(outcome.user().id).unwrap();
    assert_eq!(profile.username, "squat_sara");
}

#[tokio::test]
async fn test_invalid_sign_up_sends_no_request() {
    let auth = FakeAuth::new();
    let backend = FakeBackend::new();
    let service = AuthService::new(&auth, &backend);

    let form = SignUpForm {
        confirm_password: "Str0ng!pasS".to_string(),
        ..sign_up_form()
    };
    let err = service.sign_up(&form).await.unwrap_err();
    assert!(matches!(
        err,
        AuthError::Validation(ValidationError::PasswordMismatch)
    ));

    let form = SignUpForm {
        password: "weakpass".to_string(),
        confirm_password: "weakpass".to_string(),
        ..sign_up_form()
    };
    assert!(matches!(
        service.sign_up(&form).await.unwrap_err(),
        AuthError::Validation(_)
    ));
    assert_eq!(auth.requests(), 0);
}

#[tokio::test]
async fn test_duplicate_sign_up_creates_no_second_profile() {
    let auth = FakeAuth::new();
    let backend = FakeBackend::new();
    let service = AuthService::new(&auth, &backend);

    service.sign_up(&sign_up_form()).await.unwrap();
    let err = service.sign_up(&sign_up_form()).await.unwrap_err();
    assert!(matches!(err, AuthError::UserAlreadyExists));
}

#[tokio::test]
async fn test_login_after_sign_up() {
    let auth = FakeAuth::new();
    let backend = FakeBackend::new();
    let service = AuthService::new(&auth, &backend);
    let created = service.sign_up(&sign_up_form()).await.unwrap();

    let session = service
        .login(&LoginForm {
            email: "sara@example.com".to_string(),
            password: "Str0ng!pass".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(session.user_id(), created.user().id);

    let err = service
        .login(&LoginForm {
            email: "sara@example.com".to_string(),
            password: "Wr0ng!pass".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let requests = auth.requests();
    let err = service
        .login(&LoginForm {
            email: "sara@example.com".to_string(),
            password: String::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
    assert_eq!(auth.requests(), requests);
}

#[tokio::test]
async fn test_current_user_refreshes_a_session_about_to_expire() {
    let auth = FakeAuth::new();
    let backend = FakeBackend::new();
    let service = AuthService::new(&auth, &backend);
    let created = service.sign_up(&sign_up_form()).await.unwrap();

    let expiring = Session::new(
        SecretString::from("old-access"),
        SecretString::from("old-refresh"),
        Utc::now() + Duration::seconds(20),
        created.user().clone(),
    );
    let (session, user): (Session, AuthUser) = service.current_user(expiring).await.unwrap();
    assert_eq!(auth.refreshes(), 1);
    assert_eq!(user.id, created.user().id);
    assert_eq!(user.username(), Some("squat_sara"));
    assert!(!session.needs_refresh(Utc::now()));

    // A fresh session is used as is.
    service.current_user(session).await.unwrap();
    assert_eq!(auth.refreshes(), 1);
}
