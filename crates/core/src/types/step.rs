//! Checkout step ordering and payment method enums.
//!
//! The five-step ordering lives here and nowhere else: every transition
//! method in the session derives next/previous from [`CheckoutStep::ORDER`],
//! so adding or reordering a step is a single edit.

use serde::{Deserialize, Serialize};

/// The ordered stages a customer passes through before an order is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    /// Sign in or continue as guest.
    Identify,
    /// Billing and shipping addresses.
    Addresses,
    /// Shipping method selection.
    Shipping,
    /// Payment method selection.
    Payment,
    /// Final review and order placement.
    Review,
}

impl CheckoutStep {
    /// The authoritative step ordering.
    pub const ORDER: [Self; 5] = [
        Self::Identify,
        Self::Addresses,
        Self::Shipping,
        Self::Payment,
        Self::Review,
    ];

    /// Position of this step in the ordering.
    #[must_use]
    pub fn index(self) -> usize {
        // ORDER contains every variant, so the position always exists.
        Self::ORDER.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// The step after this one, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    /// The step before this one, if any.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.index()
            .checked_sub(1)
            .and_then(|i| Self::ORDER.get(i).copied())
    }

    /// Snake-case name, matching the wire format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identify => "identify",
            Self::Addresses => "addresses",
            Self::Shipping => "shipping",
            Self::Payment => "payment",
            Self::Review => "review",
        }
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Paypal,
    ApplePay,
    GooglePay,
}

impl PaymentMethod {
    /// Snake-case name, matching the wire format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Paypal => "paypal",
            Self::ApplePay => "apple_pay",
            Self::GooglePay => "google_pay",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_covers_every_step_once() {
        assert_eq!(CheckoutStep::ORDER.len(), 5);
        for (i, step) in CheckoutStep::ORDER.iter().enumerate() {
            assert_eq!(step.index(), i);
        }
    }

    #[test]
    fn test_next_walks_forward() {
        assert_eq!(
            CheckoutStep::Identify.next(),
            Some(CheckoutStep::Addresses)
        );
        assert_eq!(CheckoutStep::Payment.next(), Some(CheckoutStep::Review));
        assert_eq!(CheckoutStep::Review.next(), None);
    }

    #[test]
    fn test_previous_walks_backward() {
        assert_eq!(CheckoutStep::Identify.previous(), None);
        assert_eq!(
            CheckoutStep::Review.previous(),
            Some(CheckoutStep::Payment)
        );
    }

    #[test]
    fn test_step_serializes_snake_case() {
        let json = serde_json::to_string(&CheckoutStep::Addresses).unwrap();
        assert_eq!(json, "\"addresses\"");
        let json = serde_json::to_string(&PaymentMethod::ApplePay).unwrap();
        assert_eq!(json, "\"apple_pay\"");
        assert_eq!(PaymentMethod::ApplePay.as_str(), "apple_pay");
        assert_eq!(CheckoutStep::Payment.to_string(), "payment");
    }
}
