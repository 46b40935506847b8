//! Service resources, per-place results and background task components.

use bevy::prelude::*;
use bevy::tasks::Task;
use image::RgbaImage;
use std::collections::HashMap;
use std::sync::Arc;

use crate::places::PlaceId;

use super::fetch::ImageFetcher;
use super::thumbnail::MapSnapshotter;

#[derive(Resource, Clone)]
pub struct ImageServices(pub Arc<dyn ImageFetcher>);

#[derive(Resource, Clone)]
pub struct SnapshotServices(pub Arc<dyn MapSnapshotter>);

/// Most recently resolved image for each place
#[derive(Resource, Default)]
pub struct PlaceImages {
    pub images: HashMap<PlaceId, Arc<RgbaImage>>,
}

/// Most recent thumbnail for each place; absent when generation failed
#[derive(Resource, Default)]
pub struct PlaceThumbnails {
    pub thumbnails: HashMap<PlaceId, Arc<RgbaImage>>,
}

#[derive(Component)]
pub struct ImageTask {
    pub place: PlaceId,
    pub task: Task<Arc<RgbaImage>>,
}

#[derive(Component)]
pub struct ThumbnailTask {
    pub place: PlaceId,
    pub task: Task<Option<RgbaImage>>,
}
