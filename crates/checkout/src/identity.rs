//! Identity collaborator boundary.
//!
//! Authentication UI and credential handling live elsewhere; the session
//! only needs to know whether the customer is signed in and which stored
//! addresses to pre-populate.

use serde::{Deserialize, Serialize};

use stoneline_core::Address;

/// A point-in-time view of the external identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IdentitySnapshot {
    pub is_authenticated: bool,
    /// Stored billing address, if the customer has one on file.
    pub billing: Option<Address>,
    /// Stored shipping address, if the customer has one on file.
    pub shipping: Option<Address>,
}

impl IdentitySnapshot {
    /// An anonymous visitor with no stored addresses.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An authenticated customer with optional stored addresses.
    #[must_use]
    pub const fn authenticated(billing: Option<Address>, shipping: Option<Address>) -> Self {
        Self {
            is_authenticated: true,
            billing,
            shipping,
        }
    }
}
