//! Tile-size descriptor parsing and quantity/area conversion.
//!
//! Tiles are sold by the piece but priced and planned by covered area in
//! square meters. This module translates between the two.

pub mod convert;
pub mod descriptor;

pub use descriptor::{TileSizeDescriptor, TileSizeError};
