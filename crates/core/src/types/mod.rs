//! Core types for Stoneline.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod money;
pub mod step;

pub use address::Address;
pub use money::{CurrencyCode, Money};
pub use step::{CheckoutStep, PaymentMethod};
