//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Divisor applied to the zoom slider value before exponentiation.
pub const ZOOM_SCALE: f64 = -10.0;

/// Offset (in decades) added after scaling the zoom slider value.
pub const ZOOM_OFFSET: f64 = 3.0;

/// Lowest value the zoom slider produces.
pub const ZOOM_SLIDER_MIN: f64 = 10.0;

/// Highest value the zoom slider produces.
pub const ZOOM_SLIDER_MAX: f64 = 70.0;

/// Decimal places shown for latitude and longitude text.
pub const COORDINATE_DECIMALS: usize = 5;

/// Span (degrees) given to freshly created places.
pub const DEFAULT_PLACE_DELTA: f64 = 0.1;

/// Name given to a place created from the list screen.
pub const NEW_PLACE_NAME: &str = "New Place";

/// Name shown for a place whose name was never set.
pub const UNNAMED_PLACE: &str = "no name";

/// Name written by reverse geocoding when nothing useful came back.
pub const NO_NAME_PLACEHOLDER: &str = "No name";

/// Text shown for a detail with no content.
pub const EMPTY_DETAIL_TEXT: &str = "Add a description for your place";

/// Sentinel returned when a time-of-day cannot be converted.
pub const UNKNOWN_TIME: &str = "<unknown>";

/// Fixed span (degrees) of the map thumbnail around a place.
pub const THUMBNAIL_SPAN: f64 = 0.1;

/// Edge length of the map thumbnail in pixels.
pub const THUMBNAIL_SIZE: u32 = 30;

/// Edge length of the generated placeholder image in pixels.
pub const PLACEHOLDER_SIZE: u32 = 64;

/// Upper bound on a downloaded image body.
pub const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;
