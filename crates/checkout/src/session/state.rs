//! Observable checkout state.
//!
//! [`CheckoutState`] is the plain snapshot UI layers bind to. It carries
//! no behavior beyond derived reads; every mutation goes through
//! [`super::CheckoutSession`]'s command methods.

use serde::{Deserialize, Serialize};

use stoneline_core::{Address, CheckoutStep, PaymentMethod};

use crate::identity::IdentitySnapshot;
use crate::orders::CardDetails;
use crate::shipping::{ShippingMethod, ShippingZone};

/// A point-in-time snapshot of the checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutState {
    /// Current position; the single source of truth for the active form.
    pub step: CheckoutStep,
    pub is_authenticated: bool,
    /// Set when the customer explicitly opts out of identification.
    pub is_guest: bool,
    pub billing_address: Option<Address>,
    pub shipping_address: Option<Address>,
    /// When true, the shipping address mirrors billing and is not
    /// independently editable.
    pub same_as_shipping: bool,
    pub shipping_zone: Option<ShippingZone>,
    /// Available methods for the current zone; empty until resolved.
    pub shipping_methods: Vec<ShippingMethod>,
    /// Always an element of `shipping_methods` when set.
    pub selected_shipping_method: Option<ShippingMethod>,
    pub payment_method: Option<PaymentMethod>,
    /// Required only when paying by card.
    pub card_details: Option<CardDetails>,
    pub agreed_to_terms: bool,
    pub is_loading_shipping: bool,
    pub is_processing: bool,
    /// At most one user-facing message at a time; the most recent wins.
    pub error: Option<String>,
    /// Set only after a successful commit.
    pub order_id: Option<String>,
}

impl CheckoutState {
    /// Initial state for a new session.
    ///
    /// Authenticated customers (and returning guests) skip the identify
    /// step and land on the address forms, pre-populated from their
    /// stored addresses.
    #[must_use]
    pub fn initial(identity: &IdentitySnapshot) -> Self {
        let step = if identity.is_authenticated {
            CheckoutStep::Addresses
        } else {
            CheckoutStep::Identify
        };
        Self {
            step,
            is_authenticated: identity.is_authenticated,
            is_guest: false,
            billing_address: identity.billing.clone(),
            shipping_address: identity.shipping.clone(),
            same_as_shipping: identity.shipping.is_none(),
            shipping_zone: None,
            shipping_methods: Vec::new(),
            selected_shipping_method: None,
            payment_method: None,
            card_details: None,
            agreed_to_terms: false,
            is_loading_shipping: false,
            is_processing: false,
            error: None,
            order_id: None,
        }
    }

    /// The address shipments actually go to: the shipping address, or the
    /// billing address when "same as shipping" is on.
    #[must_use]
    pub fn effective_shipping_address(&self) -> Option<&Address> {
        if self.same_as_shipping {
            self.billing_address.as_ref()
        } else {
            self.shipping_address.as_ref()
        }
    }

    /// Whether the terminal commit action is reachable.
    #[must_use]
    pub fn can_place_order(&self) -> bool {
        self.agreed_to_terms && self.selected_shipping_method.is_some()
    }

    /// Drop all address-derived shipping data.
    ///
    /// Called on every effective-address change so stale rates are never
    /// shown.
    pub(crate) fn clear_shipping_state(&mut self) {
        self.shipping_zone = None;
        self.shipping_methods.clear();
        self.selected_shipping_method = None;
        self.is_loading_shipping = false;
    }
}
