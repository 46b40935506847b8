//! Small static map snapshots of a place.

use bevy::prelude::*;
use image::RgbaImage;
use thiserror::Error;

use crate::config::ServiceEndpoints;
use crate::constants::{THUMBNAIL_SIZE, THUMBNAIL_SPAN};
use crate::coordinates::MapRegion;
use crate::net::{HttpClient, NetError};
use crate::places::Place;

/// Highest tile zoom the static map service renders.
const MAX_TILE_ZOOM: f64 = 18.0;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Net(#[from] NetError),
    #[error("Failed to decode snapshot: {0}")]
    Decode(#[from] image::ImageError),
}

/// Renders a map region into a bitmap of the requested pixel size.
pub trait MapSnapshotter: Send + Sync {
    fn snapshot(&self, region: MapRegion, size: (u32, u32)) -> Result<RgbaImage, SnapshotError>;
}

/// Slippy-map zoom level whose world width best matches `span` degrees.
pub fn tile_zoom_for_span(span: f64) -> u8 {
    if !(span.is_finite() && span > 0.0) {
        return 0;
    }
    (360.0 / span).log2().round().clamp(0.0, MAX_TILE_ZOOM) as u8
}

pub struct StaticMapSnapshotter {
    client: HttpClient,
    url: String,
}

impl StaticMapSnapshotter {
    pub fn new(endpoints: &ServiceEndpoints) -> Self {
        Self {
            client: HttpClient::new(&endpoints.user_agent),
            url: endpoints.static_map_url.clone(),
        }
    }
}

impl MapSnapshotter for StaticMapSnapshotter {
    fn snapshot(&self, region: MapRegion, size: (u32, u32)) -> Result<RgbaImage, SnapshotError> {
        let center = format!("{},{}", region.center.latitude, region.center.longitude);
        let zoom = tile_zoom_for_span(region.span.latitude_delta).to_string();
        let size = format!("{}x{}", size.0, size.1);
        let bytes = self.client.get_bytes(
            &self.url,
            &[
                ("center", center.as_str()),
                ("zoom", zoom.as_str()),
                ("size", size.as_str()),
                ("maptype", "mapnik"),
            ],
        )?;
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }
}

/// Snapshot a tight square around the place. Not memoised: every call hits
/// the snapshotter.
pub fn generate_thumbnail(snapshotter: &dyn MapSnapshotter, place: &Place) -> Option<RgbaImage> {
    let region = MapRegion::around(place.coordinate(), THUMBNAIL_SPAN);
    match snapshotter.snapshot(region, (THUMBNAIL_SIZE, THUMBNAIL_SIZE)) {
        Ok(image) => Some(image),
        Err(e) => {
            warn!("Thumbnail for {:?} failed: {}", place.id, e);
            None
        }
    }
}
