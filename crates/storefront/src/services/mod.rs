//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Account forms, sign-in/out, password recovery

pub mod auth;
