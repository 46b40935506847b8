//! Unit tests for the assets module.

use image::{Rgba, RgbaImage};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

use super::*;
use crate::constants::{PLACEHOLDER_SIZE, THUMBNAIL_SIZE, THUMBNAIL_SPAN};
use crate::coordinates::{Coordinate, MapRegion};
use crate::net::NetError;
use crate::places::{Place, PlaceId};

/// Fetcher that counts calls and serves a 2x2 image, or fails when asked.
struct CountingFetcher {
    calls: AtomicUsize,
    fail: bool,
}

impl CountingFetcher {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ImageFetcher for CountingFetcher {
    fn fetch(&self, url: &Url) -> Result<RgbaImage, ImageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ImageError::Net(NetError::Status {
                status: 404,
                url: url.to_string(),
            }));
        }
        Ok(RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255])))
    }
}

fn placeholder() -> Arc<RgbaImage> {
    Arc::new(create_placeholder_image())
}

fn photo_url() -> Url {
    Url::parse("https://example.com/photo.jpg").unwrap()
}

// resolve_image
#[test]
fn test_no_url_returns_placeholder() {
    let cache = ImageCache::default();
    let fetcher = CountingFetcher::new();
    let placeholder = placeholder();

    let image = resolve_image(&cache, &fetcher, None, &placeholder);

    assert!(Arc::ptr_eq(&image, &placeholder));
    assert_eq!(fetcher.calls(), 0);
    assert!(cache.is_empty());
}

#[test]
fn test_cache_hit_skips_fetch() {
    let cache = ImageCache::default();
    let fetcher = CountingFetcher::new();
    let cached = Arc::new(RgbaImage::new(4, 4));
    cache.insert(photo_url(), cached.clone());

    let image = resolve_image(&cache, &fetcher, Some(&photo_url()), &placeholder());

    assert!(Arc::ptr_eq(&image, &cached));
    assert_eq!(fetcher.calls(), 0);
}

#[test]
fn test_cache_miss_fetches_once() {
    let cache = ImageCache::default();
    let fetcher = CountingFetcher::new();
    let placeholder = placeholder();
    let url = photo_url();

    let first = resolve_image(&cache, &fetcher, Some(&url), &placeholder);
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(first.dimensions(), (2, 2));
    assert_eq!(cache.len(), 1);

    let second = resolve_image(&cache, &fetcher, Some(&url), &placeholder);
    assert_eq!(fetcher.calls(), 1);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_failed_fetch_not_cached() {
    let cache = ImageCache::default();
    let fetcher = CountingFetcher::failing();
    let placeholder = placeholder();
    let url = photo_url();

    let image = resolve_image(&cache, &fetcher, Some(&url), &placeholder);
    assert!(Arc::ptr_eq(&image, &placeholder));
    assert!(cache.is_empty());

    // Retried on the next request
    resolve_image(&cache, &fetcher, Some(&url), &placeholder);
    assert_eq!(fetcher.calls(), 2);
}

#[test]
fn test_cache_clones_share_entries() {
    let cache = ImageCache::default();
    let other = cache.clone();
    other.insert(photo_url(), Arc::new(RgbaImage::new(1, 1)));
    assert!(cache.get(&photo_url()).is_some());
}

#[test]
fn test_placeholder_dimensions() {
    let image = create_placeholder_image();
    assert_eq!(image.dimensions(), (PLACEHOLDER_SIZE, PLACEHOLDER_SIZE));
    // Frame corner and interior differ
    assert_ne!(image.get_pixel(0, 0), image.get_pixel(PLACEHOLDER_SIZE / 2, 8));
}

// Thumbnails
#[derive(Default)]
struct RecordingSnapshotter {
    requests: Mutex<Vec<(MapRegion, (u32, u32))>>,
}

impl MapSnapshotter for RecordingSnapshotter {
    fn snapshot(&self, region: MapRegion, size: (u32, u32)) -> Result<RgbaImage, SnapshotError> {
        self.requests.lock().push((region, size));
        Ok(RgbaImage::new(size.0, size.1))
    }
}

struct FailingSnapshotter;

impl MapSnapshotter for FailingSnapshotter {
    fn snapshot(&self, _: MapRegion, _: (u32, u32)) -> Result<RgbaImage, SnapshotError> {
        Err(SnapshotError::Net(NetError::Transport {
            url: "static map".to_string(),
            message: "offline".to_string(),
        }))
    }
}

fn brisbane() -> Place {
    let mut place = Place::new(PlaceId(1));
    place.latitude = -27.4679;
    place.longitude = 153.0281;
    place.delta = 2.0;
    place
}

#[test]
fn test_thumbnail_uses_fixed_span_and_size() {
    let snapshotter = RecordingSnapshotter::default();
    let image = generate_thumbnail(&snapshotter, &brisbane()).unwrap();
    assert_eq!(image.dimensions(), (THUMBNAIL_SIZE, THUMBNAIL_SIZE));

    let requests = snapshotter.requests.lock();
    assert_eq!(requests.len(), 1);
    let (region, size) = requests[0];
    assert_eq!(region.center, Coordinate::new(-27.4679, 153.0281));
    assert_eq!(region.span.latitude_delta, THUMBNAIL_SPAN);
    assert_eq!(region.span.longitude_delta, THUMBNAIL_SPAN);
    assert_eq!(size, (THUMBNAIL_SIZE, THUMBNAIL_SIZE));
}

#[test]
fn test_thumbnail_not_memoised() {
    let snapshotter = RecordingSnapshotter::default();
    let place = brisbane();
    generate_thumbnail(&snapshotter, &place);
    generate_thumbnail(&snapshotter, &place);
    assert_eq!(snapshotter.requests.lock().len(), 2);
}

#[test]
fn test_thumbnail_failure_is_none() {
    assert!(generate_thumbnail(&FailingSnapshotter, &brisbane()).is_none());
}

#[test]
fn test_tile_zoom_for_span() {
    assert_eq!(tile_zoom_for_span(360.0), 0);
    assert_eq!(tile_zoom_for_span(0.1), 12);
    assert_eq!(tile_zoom_for_span(0.0), 0);
    assert_eq!(tile_zoom_for_span(1e-9), 18);
}

// Systems driven through a headless app
mod app {
    use bevy::prelude::*;
    use image::RgbaImage;
    use std::sync::Arc;

    use crate::assets::state::ImageTask;
    use crate::assets::{
        AssetsPlugin, PlaceImages, PlaceThumbnails, PlaceholderImage, ResolveImageRequest,
    };
    use crate::config::AppConfig;
    use crate::places::{PlaceId, PlaceStore, PlacesDeleted};
    use crate::test_support::{count, update_until};

    fn assets_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetsPlugin))
            .insert_resource(AppConfig::default())
            .insert_resource(PlaceStore::in_memory());
        app.update();
        app
    }

    fn create_place(app: &mut App) -> PlaceId {
        app.world_mut().resource_mut::<PlaceStore>().create_place()
    }

    #[test]
    fn test_resolve_request_without_url_stores_placeholder() {
        let mut app = assets_app();
        let id = create_place(&mut app);

        app.world_mut().write_message(ResolveImageRequest { place: id });
        update_until(&mut app, |world| {
            world.resource::<PlaceImages>().images.contains_key(&id)
        });

        let placeholder = app.world().resource::<PlaceholderImage>().0.clone();
        let image = app.world().resource::<PlaceImages>().images[&id].clone();
        assert!(Arc::ptr_eq(&image, &placeholder));
    }

    #[test]
    fn test_deleted_places_are_forgotten() {
        let mut app = assets_app();
        let image = Arc::new(RgbaImage::new(1, 1));
        app.world_mut()
            .resource_mut::<PlaceImages>()
            .images
            .insert(PlaceId(3), image.clone());
        app.world_mut()
            .resource_mut::<PlaceThumbnails>()
            .thumbnails
            .insert(PlaceId(3), image);

        app.world_mut().write_message(PlacesDeleted {
            ids: vec![PlaceId(3)],
        });
        app.update();

        assert!(app.world().resource::<PlaceImages>().images.is_empty());
        assert!(app.world().resource::<PlaceThumbnails>().thumbnails.is_empty());
    }

    #[test]
    fn test_image_for_deleted_place_is_dropped() {
        let mut app = assets_app();
        let id = create_place(&mut app);

        app.world_mut().write_message(ResolveImageRequest { place: id });
        app.update();
        assert_eq!(count::<ImageTask>(app.world_mut()), 1);

        app.world_mut().resource_mut::<PlaceStore>().delete_place(id);
        update_until(&mut app, |world| count::<ImageTask>(world) == 0);

        assert!(app.world().resource::<PlaceImages>().images.is_empty());
    }
}
