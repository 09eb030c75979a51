//! Postal address record used for billing and shipping.

use serde::{Deserialize, Serialize};

/// A postal address.
///
/// Empty strings mean "not provided"; the commerce API uses the same
/// convention. Phone and email are only populated on billing addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub postcode: String,
    /// ISO 3166-1 alpha-2 country code, e.g. "GB".
    pub country: String,
    /// State / county / province, where applicable.
    pub state: String,
    pub phone: String,
    pub email: String,
}

impl Address {
    /// Whether a street address has been entered.
    ///
    /// The first address line is the field every downstream consumer
    /// (rate lookup, order placement) requires.
    #[must_use]
    pub fn has_street_address(&self) -> bool {
        !self.address_1.trim().is_empty()
    }

    /// Whether a country has been selected.
    ///
    /// Shipping rates cannot be resolved without one.
    #[must_use]
    pub fn has_country(&self) -> bool {
        !self.country.trim().is_empty()
    }

    /// Whether no field has been filled in at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
