//! Forward and reverse address lookups behind one contract.
//!
//! [`Geocoder`] implementations block, so callers go through
//! [`spawn_forward`] / [`spawn_reverse`], which run the lookup on the async
//! compute pool and hand back a task whose output is the completion.

mod nominatim;


use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use std::sync::Arc;
use thiserror::Error;

use crate::config::{AppConfig, ConfigLoaded};
use crate::constants::NO_NAME_PLACEHOLDER;
use crate::coordinates::Coordinate;
use crate::net::NetError;

pub use nominatim::NominatimGeocoder;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error(transparent)]
    Net(#[from] NetError),
    #[error("Malformed geocoder response: {0}")]
    Malformed(String),
}

/// Human-readable description of a location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placemark {
    pub name: Option<String>,
    pub country: Option<String>,
    pub locality: Option<String>,
    pub admin_area: Option<String>,
}

impl Placemark {
    /// First non-empty of name, country, locality, admin area; otherwise
    /// the "No name" placeholder.
    pub fn best_name(&self) -> String {
        [
            &self.name,
            &self.country,
            &self.locality,
            &self.admin_area,
        ]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| NO_NAME_PLACEHOLDER.to_string())
    }
}

pub trait Geocoder: Send + Sync {
    /// Resolve an address to a coordinate; `None` when nothing matched.
    fn forward(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError>;

    /// Describe a coordinate; `None` when nothing is known about it.
    fn reverse(&self, coordinate: Coordinate) -> Result<Option<Placemark>, GeocodeError>;
}

/// The geocoder shared by every lookup
#[derive(Resource, Clone)]
pub struct GeocodingBridge(pub Arc<dyn Geocoder>);

/// Completion of a forward lookup
pub struct ForwardGeocodeResult {
    pub query: String,
    pub result: Result<Option<Coordinate>, GeocodeError>,
}

/// Completion of a reverse lookup
pub struct ReverseGeocodeResult {
    pub coordinate: Coordinate,
    pub result: Result<Option<Placemark>, GeocodeError>,
}

pub fn spawn_forward(geocoder: Arc<dyn Geocoder>, query: String) -> Task<ForwardGeocodeResult> {
    AsyncComputeTaskPool::get().spawn(async move {
        let result = geocoder.forward(&query);
        ForwardGeocodeResult { query, result }
    })
}

pub fn spawn_reverse(
    geocoder: Arc<dyn Geocoder>,
    coordinate: Coordinate,
) -> Task<ReverseGeocodeResult> {
    AsyncComputeTaskPool::get().spawn(async move {
        let result = geocoder.reverse(coordinate);
        ReverseGeocodeResult { coordinate, result }
    })
}

fn setup_geocoder(mut commands: Commands, config: Res<AppConfig>) {
    let geocoder = NominatimGeocoder::new(&config.data.services);
    info!("Geocoding via {}", config.data.services.geocoder_url);
    commands.insert_resource(GeocodingBridge(Arc::new(geocoder)));
}

pub struct GeocodingPlugin;

impl Plugin for GeocodingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_geocoder.after(ConfigLoaded));
    }
}
