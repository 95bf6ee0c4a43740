//! LiftFit storefront client library.
//!
//! Screen-level state and backend access for the LiftFit shop: catalog
//! browsing with filters and paging, product pages with variant selection,
//! reviews, wishlist and account auth. Presentation layers (the CLI, tests)
//! drive these types; nothing here renders.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod cards;
pub mod catalog;
pub mod config;
pub mod error;
pub mod product;
pub mod profile;
pub mod reviews;
pub mod services;
pub mod state;
pub mod storage;
pub mod wishlist;

pub use services::auth;
