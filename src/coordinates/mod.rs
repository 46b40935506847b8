//! Coordinate value types and the text validator shared by every
//! coordinate-bound field.

mod region;
mod validation;

pub use region::{Coordinate, MapRegion, RegionSpan};
pub use validation::{
    CoordinateField, ValidationError, apply, check_range, format, parse_and_validate,
};
