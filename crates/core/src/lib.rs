//! Stoneline Core - Shared types and the tile conversion engine.
//!
//! This crate provides the types used across all Stoneline components:
//! - `checkout` - Checkout orchestration over the remote commerce API
//! - `integration-tests` - End-to-end session flow tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Money, addresses, and the checkout step ordering
//! - [`tile`] - Tile-size descriptor parsing and quantity/area conversion
//! - [`totals`] - Derived checkout totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod tile;
pub mod totals;
pub mod types;

pub use tile::*;
pub use totals::*;
pub use types::*;
