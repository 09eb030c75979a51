//! Order placement contract and wire types.
//!
//! Checkout only specifies this boundary: actual charge capture and
//! stock decrement happen inside the external order-placement service.

use serde::{Deserialize, Serialize};

use stoneline_core::{Address, PaymentMethod};

use crate::cart::CartLine;
use crate::error::Result;
use crate::shipping::ShippingMethod;

/// Card fields collected when paying by card.
///
/// Gate-checked for presence only; validation and tokenization belong to
/// the payment provider. `Debug` is implemented manually so card numbers
/// never reach logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CardDetails {
    pub number: String,
    pub holder_name: String,
    /// Expiry in `MM/YY` form.
    pub expiry: String,
    pub cvc: String,
}

impl CardDetails {
    /// Whether all four fields have been filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.number.trim().is_empty()
            && !self.holder_name.trim().is_empty()
            && !self.expiry.trim().is_empty()
            && !self.cvc.trim().is_empty()
    }
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &"[REDACTED]")
            .field("holder_name", &self.holder_name)
            .field("expiry", &self.expiry)
            .field("cvc", &"[REDACTED]")
            .finish()
    }
}

/// Everything the order placement service needs to commit an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub billing_address: Address,
    /// The effective shipping address (billing when "same as shipping").
    pub shipping_address: Address,
    pub shipping_method: ShippingMethod,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_details: Option<CardDetails>,
    pub items: Vec<CartLine>,
}

/// Successful order placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_id: String,
}

/// Seam to the external order placement service.
pub trait OrderService {
    /// Commit the order; returns the order identifier on success.
    fn place_order(
        &self,
        request: &OrderRequest,
    ) -> impl Future<Output = Result<OrderConfirmation>> + Send;
}

impl<T: OrderService> OrderService for std::sync::Arc<T> {
    fn place_order(
        &self,
        request: &OrderRequest,
    ) -> impl Future<Output = Result<OrderConfirmation>> + Send {
        self.as_ref().place_order(request)
    }
}
