//! LiftFit Core - Shared domain types.
//!
//! This crate provides the types shared by every LiftFit component:
//! - `storefront` - Client library for the hosted catalog, wishlist and auth services
//! - `cli` - Command-line driver for the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, discounts, emails, stock and sizes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
