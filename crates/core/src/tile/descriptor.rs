//! Tile-size descriptor parsing.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// First two integers separated by an `x` (or `×`), e.g. `300x300`.
/// A trailing third number (thickness) is simply not captured.
#[allow(clippy::unwrap_used)] // pattern is a compile-time constant
static DIMENSIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*[x×]\s*(\d+)").unwrap());

/// A parenthesized group, e.g. the `(305x305x10)` in `49x49x10 (305x305x10)`.
#[allow(clippy::unwrap_used)] // pattern is a compile-time constant
static PAREN_GROUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^)]*)\)").unwrap());

/// Errors that can occur when parsing a [`TileSizeDescriptor`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TileSizeError {
    /// The label is empty or whitespace.
    #[error("tile size label is empty")]
    Empty,
    /// No `width x length` pattern was found in the label.
    #[error("no dimensions found in tile size label: {0}")]
    NoDimensions(String),
    /// A dimension parsed to zero; zero-area tiles cannot be converted.
    #[error("tile size label has a zero dimension: {0}")]
    ZeroDimension(String),
}

/// Physical dimensions of one purchasable tile or mosaic sheet.
///
/// Parsed from a size label such as `"300x300x16"` (width × length ×
/// thickness, millimeters). Mosaic labels encode the constituent tessera
/// size followed by the full sheet size in parentheses, e.g.
/// `"49x49x10 (305x305x10)"`; the sheet, not the tessera, is the
/// purchasable and coverable unit, so parenthesized dimensions win.
///
/// ## Examples
///
/// ```
/// use stoneline_core::TileSizeDescriptor;
///
/// let plain = TileSizeDescriptor::parse("300x300x16").unwrap();
/// assert_eq!((plain.width_mm(), plain.length_mm()), (300, 300));
///
/// let mosaic = TileSizeDescriptor::parse("49x49x10 (305x305x10)").unwrap();
/// assert_eq!((mosaic.width_mm(), mosaic.length_mm()), (305, 305));
///
/// assert!(TileSizeDescriptor::parse("sample swatch").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSizeDescriptor {
    width_mm: u32,
    length_mm: u32,
}

impl TileSizeDescriptor {
    /// Parse a descriptor from a size label.
    ///
    /// # Errors
    ///
    /// Returns an error if the label is empty, contains no
    /// `width x length` pattern, or encodes a zero dimension. Callers
    /// should treat a failed parse as "conversion unavailable" and
    /// disable area-based controls.
    pub fn parse(label: &str) -> Result<Self, TileSizeError> {
        if label.trim().is_empty() {
            return Err(TileSizeError::Empty);
        }

        // Mosaic sheet dimensions take precedence over the tessera size.
        let search_in = PAREN_GROUP
            .captures(label)
            .and_then(|c| c.get(1))
            .map_or(label, |m| m.as_str());

        let captures = DIMENSIONS
            .captures(search_in)
            .ok_or_else(|| TileSizeError::NoDimensions(label.to_owned()))?;

        let width_mm = parse_dimension(captures.get(1).map_or("", |m| m.as_str()));
        let length_mm = parse_dimension(captures.get(2).map_or("", |m| m.as_str()));

        if width_mm == 0 || length_mm == 0 {
            return Err(TileSizeError::ZeroDimension(label.to_owned()));
        }

        Ok(Self {
            width_mm,
            length_mm,
        })
    }

    /// Width of one tile/sheet in millimeters.
    #[must_use]
    pub const fn width_mm(self) -> u32 {
        self.width_mm
    }

    /// Length of one tile/sheet in millimeters.
    #[must_use]
    pub const fn length_mm(self) -> u32 {
        self.length_mm
    }
}

fn parse_dimension(s: &str) -> u32 {
    // The regex only matches digit runs; overflow on absurd labels
    // collapses to zero and is rejected by the caller.
    s.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_label_with_thickness() {
        let d = TileSizeDescriptor::parse("300x300x16").unwrap();
        assert_eq!(d.width_mm(), 300);
        assert_eq!(d.length_mm(), 300);
    }

    #[test]
    fn test_rectangular_label_without_thickness() {
        let d = TileSizeDescriptor::parse("600x300").unwrap();
        assert_eq!(d.width_mm(), 600);
        assert_eq!(d.length_mm(), 300);
    }

    #[test]
    fn test_unicode_multiplication_sign() {
        let d = TileSizeDescriptor::parse("200 × 100 × 8").unwrap();
        assert_eq!((d.width_mm(), d.length_mm()), (200, 100));
    }

    #[test]
    fn test_mosaic_label_uses_sheet_dimensions() {
        let d = TileSizeDescriptor::parse("49x49x10 (305x305x10)").unwrap();
        assert_eq!(d.width_mm(), 305);
        assert_eq!(d.length_mm(), 305);
    }

    #[test]
    fn test_empty_label() {
        assert_eq!(TileSizeDescriptor::parse("  "), Err(TileSizeError::Empty));
    }

    #[test]
    fn test_label_without_dimensions() {
        assert!(matches!(
            TileSizeDescriptor::parse("sample swatch"),
            Err(TileSizeError::NoDimensions(_))
        ));
    }

    #[test]
    fn test_single_number_is_not_a_size() {
        assert!(matches!(
            TileSizeDescriptor::parse("300mm"),
            Err(TileSizeError::NoDimensions(_))
        ));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            TileSizeDescriptor::parse("0x300"),
            Err(TileSizeError::ZeroDimension(_))
        ));
    }

    #[test]
    fn test_parens_without_dimensions_fail_rather_than_fall_back() {
        // A parenthesized note shadows the leading numbers on purpose:
        // if the group holds no size, the label is treated as unparseable
        // instead of silently using the tessera dimensions.
        assert!(matches!(
            TileSizeDescriptor::parse("300x300 (per box)"),
            Err(TileSizeError::NoDimensions(_))
        ));
    }
}
