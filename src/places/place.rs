//! Place and Detail records with their validated text views.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{DEFAULT_PLACE_DELTA, EMPTY_DETAIL_TEXT, UNNAMED_PLACE};
use crate::coordinates::{self, Coordinate, CoordinateField, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlaceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DetailId(pub u64);

fn default_delta() -> f64 {
    DEFAULT_PLACE_DELTA
}

/// One favourite location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    /// Viewport span in degrees
    #[serde(default = "default_delta")]
    pub delta: f64,
    #[serde(default)]
    pub image_url: Option<Url>,
    /// Raw time-of-day text (GMT) from the sunrise service
    #[serde(default)]
    pub sunrise: Option<String>,
    #[serde(default)]
    pub sunset: Option<String>,
    /// IANA zone identifier
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Place {
    pub fn new(id: PlaceId) -> Self {
        Self {
            id,
            name: None,
            latitude: 0.0,
            longitude: 0.0,
            delta: DEFAULT_PLACE_DELTA,
            image_url: None,
            sunrise: None,
            sunset: None,
            timezone: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_PLACE)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn latitude_text(&self) -> String {
        coordinates::format(CoordinateField::Latitude, self.latitude)
    }

    pub fn set_latitude_text(&mut self, text: &str) -> Result<f64, ValidationError> {
        coordinates::apply(CoordinateField::Latitude, &mut self.latitude, text)
    }

    pub fn longitude_text(&self) -> String {
        coordinates::format(CoordinateField::Longitude, self.longitude)
    }

    pub fn set_longitude_text(&mut self, text: &str) -> Result<f64, ValidationError> {
        coordinates::apply(CoordinateField::Longitude, &mut self.longitude, text)
    }

    pub fn delta_text(&self) -> String {
        coordinates::format(CoordinateField::Delta, self.delta)
    }

    pub fn set_delta_text(&mut self, text: &str) -> Result<f64, ValidationError> {
        coordinates::apply(CoordinateField::Delta, &mut self.delta, text)
    }

    /// Store a numeric latitude, keeping the old value if it is out of range.
    pub fn set_latitude(&mut self, value: f64) -> Result<f64, ValidationError> {
        store_checked(CoordinateField::Latitude, &mut self.latitude, value)
    }

    /// Store a numeric longitude, keeping the old value if it is out of range.
    pub fn set_longitude(&mut self, value: f64) -> Result<f64, ValidationError> {
        store_checked(CoordinateField::Longitude, &mut self.longitude, value)
    }

    pub fn set_delta(&mut self, value: f64) -> Result<f64, ValidationError> {
        store_checked(CoordinateField::Delta, &mut self.delta, value)
    }

    pub fn url_text(&self) -> String {
        self.image_url
            .as_ref()
            .map(Url::to_string)
            .unwrap_or_default()
    }

    /// Parse and store the image URL; unparseable text leaves the old URL.
    pub fn set_url_text(&mut self, text: &str) -> Result<(), ValidationError> {
        match Url::parse(text) {
            Ok(url) => {
                self.image_url = Some(url);
                Ok(())
            }
            Err(e) => {
                let err = ValidationError::InvalidUrl {
                    input: text.to_string(),
                    reason: e.to_string(),
                };
                warn!("{}", err);
                Err(err)
            }
        }
    }
}

fn store_checked(
    field: CoordinateField,
    slot: &mut f64,
    value: f64,
) -> Result<f64, ValidationError> {
    match coordinates::check_range(field, value) {
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

/// A free-text note attached to a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    pub id: DetailId,
    #[serde(default)]
    pub text: String,
    /// Owning place
    pub place: PlaceId,
}

impl Detail {
    pub fn display_text(&self) -> &str {
        if self.text.is_empty() {
            EMPTY_DETAIL_TEXT
        } else {
            &self.text
        }
    }
}
