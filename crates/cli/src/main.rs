//! LiftFit CLI - Drive the storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Home screen: news carousel and category links
//! liftfit home
//!
//! # Browse screen: one sampled row per category
//! liftfit browse
//!
//! # Shop with filters, two pages deep
//! liftfit shop --gender women --on-sale --sort price-asc --pages 2
//!
//! # Product page with a variant selected
//! liftfit product 0b8f9c3e-6a9e-4b55-a1e2-0c6d1b7a2f10 --color Black --size L
//!
//! # Wishlist (credentials from LIFTFIT_EMAIL / LIFTFIT_PASSWORD)
//! liftfit wishlist list
//! liftfit wishlist add 0b8f9c3e-6a9e-4b55-a1e2-0c6d1b7a2f10 --color Black --size M
//! liftfit wishlist remove 9a8b7c6d-5e4f-4a3b-9c2d-1e0f9a8b7c6d
//!
//! # Accounts
//! liftfit auth signup --username squat_sara --email sara@example.com --password 'Str0ng!pass'
//! liftfit auth whoami
//! ```
//!
//! # Environment Variables
//!
//! - `SUPABASE_URL` - Base URL of the hosted backend
//! - `SUPABASE_ANON_KEY` - Public API key
//! - `SENTRY_DSN` - Optional error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use liftfit_storefront::config::StorefrontConfig;
use liftfit_storefront::error::AppError;
use liftfit_storefront::state::AppState;

mod commands;

use commands::{AuthAction, ProductArgs, ShopArgs, WishlistAction};

#[derive(Parser)]
#[command(name = "liftfit")]
#[command(author, version, about = "LiftFit storefront from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show news and category links
    Home,
    /// Show a sampled row of products per category
    Browse,
    /// List products with filters and sorting
    Shop(ShopArgs),
    /// Show a product page
    Product(ProductArgs),
    /// Manage the signed-in user's wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Account sign-up, login and password management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => exit_with(&AppError::from(e)),
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "liftfit_storefront=info,liftfit_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => exit_with(&e),
    };

    if let Err(e) = run(cli, &state).await {
        exit_with(&e);
    }
}

async fn run(cli: Cli, state: &AppState) -> liftfit_storefront::error::Result<()> {
    match cli.command {
        Commands::Home => commands::home::run(state).await,
        Commands::Browse => commands::browse::run(state).await,
        Commands::Shop(args) => commands::shop::run(state, args).await,
        Commands::Product(args) => commands::product::run(state, args).await,
        Commands::Wishlist { action } => commands::wishlist::run(state, action).await,
        Commands::Auth { action } => commands::auth::run(state, action).await,
    }
}

#[allow(clippy::print_stderr)]
fn exit_with(error: &AppError) -> ! {
    error.report();
    match error {
        // Operators need the variable name to fix their environment.
        AppError::Config(e) => eprintln!("{e}"),
        _ => eprintln!("{}", error.user_message()),
    }
    std::process::exit(1);
}
