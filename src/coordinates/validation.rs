//! Parsing, range checking and formatting of coordinate text.
//!
//! Every text field bound to a coordinate goes through this pair:
//! [`parse_and_validate`] to read user input, [`format`] to render the
//! stored value. [`apply`] combines the two with the "reject and retain"
//! rule used by the record and the map engine.

use std::fmt;
use std::ops::RangeInclusive;

use bevy::prelude::*;
use thiserror::Error;

use crate::constants::COORDINATE_DECIMALS;

/// Which coordinate-like value a piece of text is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateField {
    Latitude,
    Longitude,
    Delta,
}

impl CoordinateField {
    /// Valid domain for the field, or `None` when any finite value is accepted.
    pub fn domain(&self) -> Option<RangeInclusive<f64>> {
        match self {
            CoordinateField::Latitude => Some(-90.0..=90.0),
            CoordinateField::Longitude => Some(-180.0..=180.0),
            CoordinateField::Delta => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CoordinateField::Latitude => "latitude",
            CoordinateField::Longitude => "longitude",
            CoordinateField::Delta => "delta",
        }
    }
}

impl fmt::Display for CoordinateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid {field} value {input:?}: not a number")]
    NotANumber {
        field: CoordinateField,
        input: String,
    },
    #[error("Invalid {field} value {input:?}: not finite")]
    NotFinite {
        field: CoordinateField,
        input: String,
    },
    #[error("Invalid {field} value {value}: outside {min}..={max}")]
    OutOfRange {
        field: CoordinateField,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("Invalid url {input:?}: {reason}")]
    InvalidUrl { input: String, reason: String },
}

/// Parse `input` as a real number and check it against the field's domain.
pub fn parse_and_validate(field: CoordinateField, input: &str) -> Result<f64, ValidationError> {
    let value: f64 = input.parse().map_err(|_| ValidationError::NotANumber {
        field,
        input: input.to_string(),
    })?;

    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field,
            input: input.to_string(),
        });
    }

    if let Some(domain) = field.domain()
        && !domain.contains(&value)
    {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min: *domain.start(),
            max: *domain.end(),
        });
    }

    Ok(value)
}

/// Render a stored value the way its text field shows it.
///
/// Latitude and longitude use a fixed number of decimals (rounded, not
/// truncated); delta uses the shortest plain decimal form.
pub fn format(field: CoordinateField, value: f64) -> String {
    match field {
        CoordinateField::Latitude | CoordinateField::Longitude => {
            format!("{:.*}", COORDINATE_DECIMALS, value)
        }
        CoordinateField::Delta => value.to_string(),
    }
}

/// Validate `input` and store it in `slot`.
///
/// On failure the error is logged and `slot` keeps its previous value.
pub fn apply(field: CoordinateField, slot: &mut f64, input: &str) -> Result<f64, ValidationError> {
    match parse_and_validate(field, input) {
        Ok(value) => {
            *slot = value;
            Ok(value)
        }
        Err(e) => {
            warn!("{}", e);
            Err(e)
        }
    }
}

/// Check an already-numeric value against the field's domain.
pub fn check_range(field: CoordinateField, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field,
            input: value.to_string(),
        });
    }
    match field.domain() {
        Some(domain) if !domain.contains(&value) => Err(ValidationError::OutOfRange {
            field,
            value,
            min: *domain.start(),
            max: *domain.end(),
        }),
        _ => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_scenario() {
        let mut latitude = 0.0;

        assert_eq!(apply(CoordinateField::Latitude, &mut latitude, "45"), Ok(45.0));
        assert_eq!(format(CoordinateField::Latitude, latitude), "45.00000");

        assert!(apply(CoordinateField::Latitude, &mut latitude, "91").is_err());
        assert_eq!(latitude, 45.0);
        assert_eq!(format(CoordinateField::Latitude, latitude), "45.00000");

        assert!(apply(CoordinateField::Latitude, &mut latitude, "-20.555556").is_ok());
        assert_eq!(latitude, -20.555556);
        assert_eq!(format(CoordinateField::Latitude, latitude), "-20.55556");
    }

    #[test]
    fn test_latitude_bounds_inclusive() {
        assert_eq!(parse_and_validate(CoordinateField::Latitude, "90"), Ok(90.0));
        assert_eq!(parse_and_validate(CoordinateField::Latitude, "-90"), Ok(-90.0));
        assert!(parse_and_validate(CoordinateField::Latitude, "90.000001").is_err());
    }

    #[test]
    fn test_longitude_bounds() {
        assert_eq!(parse_and_validate(CoordinateField::Longitude, "180"), Ok(180.0));
        assert_eq!(parse_and_validate(CoordinateField::Longitude, "-179.5"), Ok(-179.5));
        assert!(matches!(
            parse_and_validate(CoordinateField::Longitude, "-180.5"),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_unparseable_input_retains_value() {
        let mut longitude = 152.0;
        for input in ["", "abc", "12,5", " 10", "1.2.3"] {
            let result = apply(CoordinateField::Longitude, &mut longitude, input);
            assert!(
                matches!(result, Err(ValidationError::NotANumber { .. })),
                "expected rejection for {:?}",
                input
            );
            assert_eq!(longitude, 152.0);
        }
    }

    #[test]
    fn test_non_finite_rejected_for_every_field() {
        for field in [
            CoordinateField::Latitude,
            CoordinateField::Longitude,
            CoordinateField::Delta,
        ] {
            assert!(parse_and_validate(field, "NaN").is_err());
            assert!(parse_and_validate(field, "inf").is_err());
        }
    }

    #[test]
    fn test_delta_accepts_any_real() {
        assert_eq!(parse_and_validate(CoordinateField::Delta, "1000"), Ok(1000.0));
        assert_eq!(parse_and_validate(CoordinateField::Delta, "-3.5"), Ok(-3.5));
        assert_eq!(parse_and_validate(CoordinateField::Delta, "1e-3"), Ok(0.001));
    }

    #[test]
    fn test_delta_format_is_plain_decimal() {
        assert_eq!(format(CoordinateField::Delta, 0.2), "0.2");
        assert_eq!(format(CoordinateField::Delta, 1.0), "1");
        assert_eq!(format(CoordinateField::Delta, 0.00001), "0.00001");
    }

    #[test]
    fn test_round_trip_after_canonicalization() {
        for input in ["0", "12.3", "-45.123456", "89.999999", "-0.000004"] {
            let value = parse_and_validate(CoordinateField::Latitude, input).unwrap();
            let expected = format!("{:.5}", input.parse::<f64>().unwrap());
            assert_eq!(format(CoordinateField::Latitude, value), expected);
        }
    }

    #[test]
    fn test_check_range() {
        assert!(check_range(CoordinateField::Latitude, 12.0).is_ok());
        assert!(check_range(CoordinateField::Latitude, -91.0).is_err());
        assert!(check_range(CoordinateField::Delta, f64::NAN).is_err());
    }
}
