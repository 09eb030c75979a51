//! Shipping zones, methods, and the rate service contract.
//!
//! Rates are address-derived: the session clears all shipping state the
//! moment the effective shipping address changes, and every resolve
//! replaces the zone and method list wholesale. The staleness guard for
//! concurrent resolves lives in the session; this module only defines
//! the wire shapes and the service seam.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stoneline_core::Address;

use crate::error::Result;

/// A server-resolved region grouping for an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingZone {
    pub id: String,
    pub name: String,
}

/// One shipping method available in a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingMethod {
    /// Instance id, unique within the zone.
    pub id: String,
    /// Carrier/method identifier, e.g. `flat_rate`.
    pub method_id: String,
    pub title: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub cost: Decimal,
    pub taxable: bool,
}

/// Rate lookup request: the address fields the rate service keys on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRequest {
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl RateRequest {
    /// Build a request from an address.
    ///
    /// Optional fields are dropped when blank so the rate service falls
    /// back to country-level zones.
    #[must_use]
    pub fn from_address(address: &Address) -> Self {
        let non_blank = |s: &str| {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        Self {
            country: address.country.trim().to_string(),
            postcode: non_blank(&address.postcode),
            state: non_blank(&address.state),
            city: non_blank(&address.city),
        }
    }
}

/// Rate lookup response.
///
/// `methods` may be empty; `message` then carries the server-provided
/// explanation for the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RateResponse {
    pub zone: Option<ShippingZone>,
    #[serde(default)]
    pub methods: Vec<ShippingMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Seam to the external shipping rate service.
///
/// One request per call; no retry, no caching. Implemented by
/// [`crate::commerce::CommerceClient`] in production and by scripted
/// mocks in tests.
pub trait RateService {
    /// Look up the zone and available methods for an address.
    fn resolve_rates(
        &self,
        request: &RateRequest,
    ) -> impl Future<Output = Result<RateResponse>> + Send;
}

impl<T: RateService> RateService for std::sync::Arc<T> {
    fn resolve_rates(
        &self,
        request: &RateRequest,
    ) -> impl Future<Output = Result<RateResponse>> + Send {
        self.as_ref().resolve_rates(request)
    }
}
