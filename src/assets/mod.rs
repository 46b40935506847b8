//! Place imagery: the URL-keyed image cache, the placeholder, and map
//! thumbnails.
//!
//! Image resolution and thumbnail generation both block on the network, so
//! requests arrive as messages, run on the async compute pool, and land in
//! [`PlaceImages`] / [`PlaceThumbnails`] once polled.

mod cache;
mod fetch;
mod placeholder;
mod state;
mod systems;
mod thumbnail;

#[cfg(test)]
mod tests;

use bevy::prelude::*;

use crate::config::ConfigLoaded;
use crate::places::{PlaceId, PlacesDeleted};

pub use cache::{ImageCache, resolve_image};
pub use fetch::{HttpImageFetcher, ImageError, ImageFetcher};
pub use placeholder::{PlaceholderImage, create_placeholder_image};
pub use state::{ImageServices, PlaceImages, PlaceThumbnails, SnapshotServices};
pub use thumbnail::{
    MapSnapshotter, SnapshotError, StaticMapSnapshotter, generate_thumbnail, tile_zoom_for_span,
};

/// Resolve (or re-resolve) the image for a place
#[derive(Message, Debug, Clone, Copy)]
pub struct ResolveImageRequest {
    pub place: PlaceId,
}

/// Regenerate the map thumbnail for a place
#[derive(Message, Debug, Clone, Copy)]
pub struct ThumbnailRequest {
    pub place: PlaceId,
}

pub struct AssetsPlugin;

impl Plugin for AssetsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ImageCache>()
            .init_resource::<PlaceholderImage>()
            .init_resource::<PlaceImages>()
            .init_resource::<PlaceThumbnails>()
            .add_message::<ResolveImageRequest>()
            .add_message::<ThumbnailRequest>()
            .add_message::<PlacesDeleted>()
            .add_systems(Startup, systems::setup_asset_services.after(ConfigLoaded))
            .add_systems(
                Update,
                (
                    systems::start_image_resolution.run_if(on_message::<ResolveImageRequest>),
                    systems::start_thumbnail_generation.run_if(on_message::<ThumbnailRequest>),
                    (
                        systems::poll_image_tasks,
                        systems::poll_thumbnail_tasks,
                        systems::forget_deleted_places.run_if(on_message::<PlacesDeleted>),
                    )
                        .chain(),
                ),
            );
    }
}
