//! Stoneline checkout orchestration.
//!
//! This crate owns the client-side checkout contract for the Stoneline
//! tile storefront: the five-step [`session::CheckoutSession`] state
//! machine, shipping-rate resolution with a latest-wins staleness guard,
//! and the order placement contract. Rendering, product data, and cart
//! line-item storage are external collaborators; only their boundary
//! types live here.
//!
//! # Architecture
//!
//! - [`session`] - The checkout state machine and observable state snapshots
//! - [`shipping`] - Shipping zones, methods, and the rate service contract
//! - [`orders`] - Order placement contract and wire types
//! - [`cart`] / [`identity`] - Consumed collaborator snapshots
//! - [`commerce`] - `reqwest` client for the remote commerce API
//! - [`config`] - Environment-variable configuration
//!
//! Core logic has zero UI dependency: the session exposes plain command
//! methods, and UI layers observe [`session::CheckoutState`] snapshots
//! through a `tokio::sync::watch` channel.
//!
//! # Example
//!
//! ```rust,ignore
//! use stoneline_checkout::commerce::CommerceClient;
//! use stoneline_checkout::session::CheckoutSession;
//!
//! let client = CommerceClient::new(&config.commerce)?;
//! let session = CheckoutSession::new(client.clone(), client, cart, &identity);
//!
//! session.set_billing_address(billing);
//! session.resolve_shipping().await?;
//! session.complete_step(CheckoutStep::Addresses)?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod commerce;
pub mod config;
pub mod error;
pub mod identity;
pub mod orders;
pub mod session;
pub mod shipping;

pub use error::{CheckoutError, Result};
