//! The map view-model: working fields, the rendered region, and the rules
//! that keep them in step with the bound place.

use bevy::prelude::*;

use crate::constants::NO_NAME_PLACEHOLDER;
use crate::coordinates::{self, Coordinate, CoordinateField, MapRegion, ValidationError};
use crate::geocoding::{GeocodeError, Placemark};
use crate::places::{Place, PlaceId};

use super::zoom::{clamp_zoom, delta_to_zoom, zoom_to_delta};

/// How the presentation layer should move to a new region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionTransition {
    #[default]
    Animated,
    /// The region came from the map itself (drag/pinch)
    Immediate,
}

/// Working copy of the place shown on the map screen.
///
/// Edits land here first and reach the place only through [`commit_to`].
///
/// [`commit_to`]: MapSync::commit_to
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct MapSync {
    bound_place: Option<PlaceId>,
    name: String,
    latitude: f64,
    longitude: f64,
    delta: f64,
    region: MapRegion,
    region_transition: RegionTransition,
    /// Bumped on every region change so renderers can detect updates
    region_revision: u64,
}

impl Default for MapSync {
    fn default() -> Self {
        let delta = crate::constants::DEFAULT_PLACE_DELTA;
        Self {
            bound_place: None,
            name: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            delta,
            region: MapRegion::around(Coordinate::default(), delta),
            region_transition: RegionTransition::Animated,
            region_revision: 0,
        }
    }
}

impl MapSync {
    pub fn bound_place(&self) -> Option<PlaceId> {
        self.bound_place
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn region(&self) -> MapRegion {
        self.region
    }

    pub fn region_transition(&self) -> RegionTransition {
        self.region_transition
    }

    pub fn region_revision(&self) -> u64 {
        self.region_revision
    }

    /// Slider position for the current span.
    pub fn zoom(&self) -> f64 {
        clamp_zoom(delta_to_zoom(self.delta))
    }

    /// Address text typed by the user
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Copy the place into the working fields and centre on it.
    pub fn load_place(&mut self, place: &Place) {
        self.bound_place = Some(place.id);
        self.name = place.name.clone().unwrap_or_default();
        self.latitude = place.latitude;
        self.longitude = place.longitude;
        self.delta = place.delta;
        self.recenter();
    }

    /// Move the viewport with an animated transition. Working fields are
    /// left alone.
    pub fn set_region(&mut self, region: MapRegion) {
        self.region = region;
        self.region_transition = RegionTransition::Animated;
        self.region_revision += 1;
    }

    /// Centre the viewport on the working coordinate with a square span of
    /// the working delta.
    pub fn recenter(&mut self) {
        self.set_region(MapRegion::around(self.coordinate(), self.delta));
    }

    /// Start an address lookup from the name field. Returns the query to
    /// geocode, or `None` when there is nothing to look up.
    pub fn confirm_address(&self) -> Option<String> {
        let query = self.name.trim();
        (!query.is_empty()).then(|| query.to_string())
    }

    /// Apply a finished forward lookup: take the first hit, or keep the
    /// prior coordinate when nothing matched. Either way the map recentres.
    /// Failures are logged and change nothing.
    pub fn apply_forward_result(&mut self, result: Result<Option<Coordinate>, GeocodeError>) {
        match result {
            Ok(Some(found)) => {
                let in_range = coordinates::check_range(CoordinateField::Latitude, found.latitude)
                    .and(coordinates::check_range(
                        CoordinateField::Longitude,
                        found.longitude,
                    ));
                match in_range {
                    Ok(_) => {
                        self.latitude = found.latitude;
                        self.longitude = found.longitude;
                    }
                    Err(e) => warn!("Ignoring geocoder result: {}", e),
                }
                self.recenter();
            }
            Ok(None) => {
                debug!("Address {:?} not found, keeping coordinate", self.name);
                self.recenter();
            }
            Err(e) => warn!("Forward geocoding failed: {}", e),
        }
    }

    /// The user moved the map. The region is authoritative: the working
    /// coordinate follows its centre. Returns the coordinate to describe.
    pub fn drag_region(&mut self, region: MapRegion) -> Coordinate {
        self.region = region;
        self.region_transition = RegionTransition::Immediate;
        self.region_revision += 1;
        self.pin_location()
    }

    /// Take the working coordinate from the region centre. Returns the
    /// coordinate to describe.
    pub fn pin_location(&mut self) -> Coordinate {
        let center = self.region.center.normalized();
        self.latitude = center.latitude;
        self.longitude = center.longitude;
        self.coordinate()
    }

    /// Apply a finished reverse lookup to the name field.
    pub fn apply_reverse_result(&mut self, result: Result<Option<Placemark>, GeocodeError>) {
        match result {
            Ok(Some(placemark)) => self.name = placemark.best_name(),
            Ok(None) => self.name = NO_NAME_PLACEHOLDER.to_string(),
            Err(e) => warn!("Reverse geocoding failed: {}", e),
        }
    }

    /// Set the span from a slider position and recentre. Returns the
    /// coordinate to describe.
    pub fn set_zoom(&mut self, z: f64) -> Coordinate {
        self.delta = zoom_to_delta(clamp_zoom(z));
        self.recenter();
        self.coordinate()
    }

    pub fn latitude_text(&self) -> String {
        coordinates::format(CoordinateField::Latitude, self.latitude)
    }

    pub fn set_latitude_text(&mut self, text: &str) -> Result<f64, ValidationError> {
        let value = coordinates::apply(CoordinateField::Latitude, &mut self.latitude, text)?;
        self.recenter();
        Ok(value)
    }

    pub fn longitude_text(&self) -> String {
        coordinates::format(CoordinateField::Longitude, self.longitude)
    }

    pub fn set_longitude_text(&mut self, text: &str) -> Result<f64, ValidationError> {
        let value = coordinates::apply(CoordinateField::Longitude, &mut self.longitude, text)?;
        self.recenter();
        Ok(value)
    }

    pub fn delta_text(&self) -> String {
        coordinates::format(CoordinateField::Delta, self.delta)
    }

    pub fn set_delta_text(&mut self, text: &str) -> Result<f64, ValidationError> {
        let value = coordinates::apply(CoordinateField::Delta, &mut self.delta, text)?;
        self.recenter();
        Ok(value)
    }

    /// Write the working fields into `place`. Nothing is written unless
    /// latitude, longitude and delta are all valid. Empty names are not
    /// written.
    pub fn commit_to(&self, place: &mut Place) -> Result<(), ValidationError> {
        let checked = coordinates::check_range(CoordinateField::Latitude, self.latitude)
            .and_then(|_| coordinates::check_range(CoordinateField::Longitude, self.longitude))
            .and_then(|_| coordinates::check_range(CoordinateField::Delta, self.delta));
        if let Err(e) = checked {
            warn!("Not saving map changes to {:?}: {}", place.id, e);
            return Err(e);
        }

        if !self.name.trim().is_empty() {
            place.set_name(self.name.clone());
        }
        place.latitude = self.latitude;
        place.longitude = self.longitude;
        place.delta = self.delta;
        Ok(())
    }
}
