use serde::{Deserialize, Serialize};

/// A point on the globe in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude clamped to the poles, longitude wrapped into [-180, 180].
    ///
    /// Map views report centres past the antimeridian after panning.
    pub fn normalized(self) -> Self {
        let longitude = if (-180.0..=180.0).contains(&self.longitude) {
            self.longitude
        } else {
            (self.longitude + 180.0).rem_euclid(360.0) - 180.0
        };
        Self::new(self.latitude.clamp(-90.0, 90.0), longitude)
    }
}

/// Angular extent of a viewport in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RegionSpan {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl RegionSpan {
    /// Equal extent in both directions.
    pub fn symmetric(delta: f64) -> Self {
        Self {
            latitude_delta: delta,
            longitude_delta: delta,
        }
    }
}

/// The renderable map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MapRegion {
    pub center: Coordinate,
    pub span: RegionSpan,
}

impl MapRegion {
    pub fn new(center: Coordinate, span: RegionSpan) -> Self {
        Self { center, span }
    }

    /// Square region of `delta` degrees around `center`.
    pub fn around(center: Coordinate, delta: f64) -> Self {
        Self::new(center, RegionSpan::symmetric(delta))
    }
}
