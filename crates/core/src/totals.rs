//! Derived checkout totals.
//!
//! A [`CheckoutTotals`] is a view, not an entity: it is recomputed from
//! the cart figures and the currently selected shipping cost on every
//! read, and holds no state of its own.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CurrencyCode, Money};

/// The payable breakdown shown on every checkout screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub currency_code: CurrencyCode,
}

impl CheckoutTotals {
    /// Merge cart subtotal/discount with the selected shipping cost.
    ///
    /// With no shipping method selected yet, shipping contributes zero.
    /// Every figure is normalized to 2 decimal places.
    #[must_use]
    pub fn compute(
        subtotal: Decimal,
        discount: Decimal,
        shipping_cost: Option<Decimal>,
        currency_code: CurrencyCode,
    ) -> Self {
        let shipping = shipping_cost.unwrap_or(Decimal::ZERO).round_dp(2);
        let subtotal = subtotal.round_dp(2);
        let discount = discount.round_dp(2);
        Self {
            subtotal,
            discount,
            shipping,
            total: subtotal - discount + shipping,
            currency_code,
        }
    }

    /// The currency's display symbol.
    #[must_use]
    pub const fn currency_symbol(&self) -> &'static str {
        self.currency_code.symbol()
    }

    /// Total as displayable money.
    #[must_use]
    pub const fn total_money(&self) -> Money {
        Money::new(self.total, self.currency_code)
    }
}
