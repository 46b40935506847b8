//! Process-lifetime image cache keyed by source URL.

use bevy::prelude::*;
use image::RgbaImage;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use super::fetch::ImageFetcher;

/// Decoded images shared between the main schedule and fetch tasks.
///
/// Unbounded and never evicted. Clones share the same map.
#[derive(Resource, Clone, Default)]
pub struct ImageCache {
    entries: Arc<RwLock<HashMap<Url, Arc<RgbaImage>>>>,
}

impl ImageCache {
    pub fn get(&self, url: &Url) -> Option<Arc<RgbaImage>> {
        self.entries.read().get(url).cloned()
    }

    /// Last insert for a URL wins.
    pub fn insert(&self, url: Url, image: Arc<RgbaImage>) {
        self.entries.write().insert(url, image);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Resolve the image for an optional URL.
///
/// No URL gives the placeholder. A cached URL is returned without touching
/// `fetcher`. A miss fetches once and caches the decoded image; any failure
/// returns the placeholder and caches nothing.
pub fn resolve_image(
    cache: &ImageCache,
    fetcher: &dyn ImageFetcher,
    url: Option<&Url>,
    placeholder: &Arc<RgbaImage>,
) -> Arc<RgbaImage> {
    let Some(url) = url else {
        return placeholder.clone();
    };

    if let Some(image) = cache.get(url) {
        return image;
    }

    match fetcher.fetch(url) {
        Ok(image) => {
            let image = Arc::new(image);
            cache.insert(url.clone(), image.clone());
            debug!("Cached image {} ({} entries)", url, cache.len());
            image
        }
        Err(e) => {
            warn!("Failed to load image {}: {}", url, e);
            placeholder.clone()
        }
    }
}
