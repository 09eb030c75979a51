//! Quantity/area conversion for tile purchases.
//!
//! All arithmetic is `Decimal`, so repeated edits never accumulate
//! floating-point drift. Two distinct figures exist on purpose:
//!
//! - [`TileSizeDescriptor::piece_area_m2`] drives every quantity/area
//!   conversion.
//! - [`TileSizeDescriptor::pieces_per_sqm`] is a coarser ceiling figure
//!   used only to derive an indicative per-piece price for display. It
//!   must never feed back into the conversions, or rounding error would
//!   compound across repeated edits.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::descriptor::TileSizeDescriptor;

const MM2_PER_M2: u64 = 1_000_000;

impl TileSizeDescriptor {
    /// Area covered by one tile/sheet, in square meters.
    ///
    /// Exact, unrounded; this is also the area-stepper granularity, so
    /// every increment or decrement moves by one whole tile's footprint
    /// and quantity stays an integer after each step.
    #[must_use]
    pub fn piece_area_m2(self) -> Decimal {
        let mm2 = u64::from(self.width_mm()) * u64::from(self.length_mm());
        Decimal::from(mm2) / Decimal::from(MM2_PER_M2)
    }

    /// Minimum area increment: one piece's footprint.
    #[must_use]
    pub fn min_area_increment_m2(self) -> Decimal {
        self.piece_area_m2()
    }

    /// Covered area for a tile count, rounded to 2 decimal places.
    ///
    /// Zero or negative quantities clamp to zero area.
    #[must_use]
    pub fn quantity_to_area(self, quantity: i64) -> Decimal {
        if quantity <= 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(quantity) * self.piece_area_m2())
            .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    }

    /// Tile count needed to cover an area.
    ///
    /// Always rounds up: partial tiles cannot be purchased. This makes
    /// the conversion deliberately not a strict inverse of
    /// [`Self::quantity_to_area`] -- converting the resulting quantity
    /// back to area yields at least the requested area.
    ///
    /// Zero or negative areas clamp to a zero count.
    #[must_use]
    pub fn area_to_quantity(self, area_m2: Decimal) -> u32 {
        if area_m2 <= Decimal::ZERO {
            return 0;
        }
        (area_m2 / self.piece_area_m2())
            .ceil()
            .to_u32()
            .unwrap_or(u32::MAX)
    }

    /// How many pieces cover one square meter, rounded up.
    ///
    /// Display-only figure for indicative per-piece pricing; see the
    /// module docs for why the quantity/area conversions never use it.
    #[must_use]
    pub const fn pieces_per_sqm(self) -> u32 {
        let mm2 = self.width_mm() as u64 * self.length_mm() as u64;
        // A 1mm x 1mm tile yields 1_000_000 pieces, well inside u32.
        MM2_PER_M2.div_ceil(mm2) as u32
    }

    /// Indicative per-piece price from a per-square-meter price.
    #[must_use]
    pub fn piece_price(self, price_per_sqm: Decimal) -> Decimal {
        (price_per_sqm / Decimal::from(self.pieces_per_sqm()))
            .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn square_300() -> TileSizeDescriptor {
        TileSizeDescriptor::parse("300x300x16").unwrap()
    }

    #[test]
    fn test_piece_area_for_300_square() {
        assert_eq!(square_300().piece_area_m2(), dec("0.09"));
        assert_eq!(square_300().min_area_increment_m2(), dec("0.09"));
    }

    #[test]
    fn test_quantity_to_area() {
        assert_eq!(square_300().quantity_to_area(5), dec("0.45"));
        assert_eq!(square_300().quantity_to_area(0), Decimal::ZERO);
        assert_eq!(square_300().quantity_to_area(-3), Decimal::ZERO);
    }

    #[test]
    fn test_area_to_quantity_rounds_up() {
        // ceil(0.40 / 0.09) = ceil(4.44) = 5
        assert_eq!(square_300().area_to_quantity(dec("0.40")), 5);
        // exact multiples do not round up further
        assert_eq!(square_300().area_to_quantity(dec("0.45")), 5);
        assert_eq!(square_300().area_to_quantity(Decimal::ZERO), 0);
        assert_eq!(square_300().area_to_quantity(dec("-1")), 0);
    }

    #[test]
    fn test_round_trip_never_loses_coverage() {
        // areaToQuantity(quantityToArea(q)) >= q for every positive q
        let sizes = [
            "300x300x16",
            "600x300x10",
            "75x150x8",
            "49x49x10 (305x305x10)",
        ];
        for label in sizes {
            let d = TileSizeDescriptor::parse(label).unwrap();
            for q in 1..200i64 {
                let area = d.quantity_to_area(q);
                let back = i64::from(d.area_to_quantity(area));
                assert!(back >= q, "{label}: q={q} area={area} back={back}");
            }
        }
    }

    #[test]
    fn test_area_round_trip_covers_request() {
        // quantityToArea(areaToQuantity(a)) >= a for positive a
        let d = square_300();
        for tenth in 1..100i64 {
            let a = Decimal::from(tenth) / Decimal::from(10);
            let q = d.area_to_quantity(a);
            assert!(d.quantity_to_area(i64::from(q)) >= a, "a={a} q={q}");
        }
    }

    #[test]
    fn test_pieces_per_sqm_rounds_up() {
        // 1_000_000 / 90_000 = 11.1 -> 12
        assert_eq!(square_300().pieces_per_sqm(), 12);
        // exact division stays exact
        let half_meter = TileSizeDescriptor::parse("500x500").unwrap();
        assert_eq!(half_meter.pieces_per_sqm(), 4);
    }

    #[test]
    fn test_piece_price_uses_coarse_figure() {
        // £36.00/sqm over 12 pieces -> £3.00 indicative per piece
        assert_eq!(square_300().piece_price(dec("36.00")), dec("3.00"));
    }

    #[test]
    fn test_mosaic_converts_by_sheet_area() {
        let d = TileSizeDescriptor::parse("49x49x10 (305x305x10)").unwrap();
        // 305 * 305 = 93_025 mm2
        assert_eq!(d.piece_area_m2(), dec("0.093025"));
        assert_eq!(d.quantity_to_area(10), dec("0.93"));
    }
}
