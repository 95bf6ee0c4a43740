//! Core types for LiftFit.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod gender;
pub mod id;
pub mod price;
pub mod size;
pub mod stock;

pub use email::{Email, EmailError};
pub use gender::Gender;
pub use id::*;
pub use price::{CurrencyCode, Discount, DiscountError, Price, Pricing};
pub use size::Size;
pub use stock::{Availability, StockLevel};
