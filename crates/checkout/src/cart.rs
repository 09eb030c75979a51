//! Cart collaborator boundary.
//!
//! The cart's line-item storage is owned elsewhere; checkout consumes a
//! snapshot of its lines and aggregate totals, and asks the owner to
//! clear the cart after a successful order placement.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stoneline_core::CurrencyCode;

/// One purchasable line as the cart collaborator reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub title: String,
    /// Selected variation title, e.g. the tile size label.
    pub variant_title: Option<String>,
    pub sku: Option<String>,
    /// Number of pieces (tiles or mosaic sheets).
    pub quantity: u32,
    /// Unit price per piece.
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_price: Decimal,
    /// Extended line total.
    #[serde(with = "rust_decimal::serde::str")]
    pub line_total: Decimal,
    /// Tile size label for area display, e.g. `300x300x16`.
    pub size_label: Option<String>,
}

/// Aggregate totals as the cart collaborator reports them.
///
/// The wire format carries amounts as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub tax: Decimal,
    pub currency_code: CurrencyCode,
}

/// A point-in-time view of the external cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<CartLine>,
    pub totals: CartTotals,
}

impl CartSnapshot {
    /// Total number of pieces across all lines.
    #[must_use]
    pub fn items_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Whether the cart holds no lines.
    ///
    /// Checkout sessions are only created from non-empty carts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn snapshot() -> CartSnapshot {
        CartSnapshot {
            items: vec![
                CartLine {
                    id: "line-1".to_string(),
                    title: "Slate Grey Porcelain".to_string(),
                    variant_title: Some("300x300x16".to_string()),
                    sku: Some("SLT-300".to_string()),
                    quantity: 12,
                    unit_price: Decimal::from_str("3.00").unwrap(),
                    line_total: Decimal::from_str("36.00").unwrap(),
                    size_label: Some("300x300x16".to_string()),
                },
                CartLine {
                    id: "line-2".to_string(),
                    title: "Travertine Mosaic".to_string(),
                    variant_title: Some("49x49x10 (305x305x10)".to_string()),
                    sku: None,
                    quantity: 3,
                    unit_price: Decimal::from_str("18.50").unwrap(),
                    line_total: Decimal::from_str("55.50").unwrap(),
                    size_label: Some("49x49x10 (305x305x10)".to_string()),
                },
            ],
            totals: CartTotals {
                subtotal: Decimal::from_str("91.50").unwrap(),
                discount: Decimal::ZERO,
                tax: Decimal::from_str("18.30").unwrap(),
                currency_code: CurrencyCode::GBP,
            },
        }
    }

    #[test]
    fn test_items_count_sums_quantities() {
        assert_eq!(snapshot().items_count(), 15);
        assert!(!snapshot().is_empty());
    }

    #[test]
    fn test_totals_serialize_as_decimal_strings() {
        let json = serde_json::to_value(&snapshot().totals).unwrap();
        assert_eq!(json["subtotal"], "91.50");
        assert_eq!(json["tax"], "18.30");
    }
}
