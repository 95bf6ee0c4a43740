//! `liftfit auth`.
//!
//! The CLI keeps no session on disk: commands that need one sign in with
//! the given credentials first.

use clap::{Args, Subcommand};

use liftfit_storefront::auth::{
    AuthService, ForgotPasswordForm, LoginForm, ResetPasswordForm, Session, SignUpForm,
    SignUpOutcome,
};
use liftfit_storefront::error::Result;
use liftfit_storefront::profile::ProfileStore;
use liftfit_storefront::state::AppState;

/// Account credentials.
#[derive(Args)]
pub struct Credentials {
    /// Account email address
    #[arg(long, env = "LIFTFIT_EMAIL")]
    pub email: String,

    /// Account password
    #[arg(long, env = "LIFTFIT_PASSWORD", hide_env_values = true)]
    pub password: String,
}

impl Credentials {
    /// Sign in and return the session.
    pub async fn login(&self, state: &AppState) -> Result<Session> {
        let form = LoginForm {
            email: self.email.clone(),
            password: self.password.clone(),
        };
        let session = AuthService::new(state.auth(), state.backend())
            .login(&form)
            .await?;
        Ok(session)
    }
}

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create an account
    Signup {
        /// Username (3-20 letters, numbers or underscores)
        #[arg(long)]
        username: String,

        #[command(flatten)]
        credentials: Credentials,

        /// Password confirmation; defaults to the password
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Sign in and show the profile greeting
    Login {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Sign in and show the account the auth service reports
    Whoami {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Sign in, then revoke the session
    Logout {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Send a password reset email
    Forgot {
        /// Account email address
        #[arg(long, env = "LIFTFIT_EMAIL")]
        email: String,
    },
    /// Change the password
    Reset {
        #[command(flatten)]
        credentials: Credentials,

        /// New password
        #[arg(long)]
        new_password: String,

        /// New password confirmation
        #[arg(long)]
        confirm_password: String,
    },
}

#[allow(clippy::print_stdout)]
pub async fn run(state: &AppState, action: AuthAction) -> Result<()> {
    let service = AuthService::new(state.auth(), state.backend());

    match action {
        AuthAction::Signup {
            username,
            credentials,
            confirm_password,
        } => {
            let form = SignUpForm {
                username,
                email: credentials.email,
                confirm_password: confirm_password
                    .unwrap_or_else(|| credentials.password.clone()),
                password: credentials.password,
            };
            match service.sign_up(&form).await? {
                SignUpOutcome::ConfirmationSent(_) => {
                    println!("Check your email to confirm your account, then log in.");
                }
                SignUpOutcome::SignedIn(session) => greet(state, &session).await,
            }
        }
        AuthAction::Login { credentials } => {
            let session = credentials.login(state).await?;
            greet(state, &session).await;
        }
        AuthAction::Whoami { credentials } => {
            let session = credentials.login(state).await?;
            let (_, user) = service.current_user(session).await?;
            println!("User ID:  {}", user.id);
            println!("Email:    {}", user.email.as_deref().unwrap_or("-"));
            println!("Username: {}", user.username().unwrap_or("-"));
        }
        AuthAction::Logout { credentials } => {
            let session = credentials.login(state).await?;
            service.logout(&session).await?;
            println!("Signed out.");
        }
        AuthAction::Forgot { email } => {
            service
                .forgot_password(&ForgotPasswordForm { email })
                .await?;
            println!("If an account exists for that email, a reset link is on its way.");
        }
        AuthAction::Reset {
            credentials,
            new_password,
            confirm_password,
        } => {
            let session = credentials.login(state).await?;
            let form = ResetPasswordForm {
                password: new_password,
                confirm_password,
            };
            service.reset_password(&session, &form).await?;
            println!("Password updated.");
        }
    }
    Ok(())
}

/// Print the profile greeting, falling back to the auth username.
#[allow(clippy::print_stdout)]
async fn greet(state: &AppState, session: &Session) {
    let greeting = match state.backend().profile(session).await {
        Ok(Some(profile)) => profile.greeting(),
        Ok(None) => greeting_from_session(session),
        Err(e) => {
            tracing::warn!(error = %e, "Error fetching profile");
            greeting_from_session(session)
        }
    };
    println!("{greeting}");
}

fn greeting_from_session(session: &Session) -> String {
    let user = session.user();
    let name = user
        .username()
        .or(user.email.as_deref())
        .unwrap_or("there");
    format!("Hi, {name}!")
}
