//! Bevy systems for image resolution and thumbnails.

use bevy::prelude::*;
use bevy::tasks::AsyncComputeTaskPool;
use futures_lite::future;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::places::{PlaceStore, PlacesDeleted};

use super::cache::{ImageCache, resolve_image};
use super::fetch::HttpImageFetcher;
use super::placeholder::PlaceholderImage;
use super::state::{
    ImageServices, ImageTask, PlaceImages, PlaceThumbnails, SnapshotServices, ThumbnailTask,
};
use super::thumbnail::{StaticMapSnapshotter, generate_thumbnail};
use super::{ResolveImageRequest, ThumbnailRequest};

/// Startup system that installs the HTTP image fetcher and map snapshotter
pub fn setup_asset_services(mut commands: Commands, config: Res<AppConfig>) {
    let services = &config.data.services;
    commands.insert_resource(ImageServices(Arc::new(HttpImageFetcher::new(services))));
    commands.insert_resource(SnapshotServices(Arc::new(StaticMapSnapshotter::new(
        services,
    ))));
}

pub fn start_image_resolution(
    mut commands: Commands,
    mut events: MessageReader<ResolveImageRequest>,
    store: Res<PlaceStore>,
    cache: Res<ImageCache>,
    services: Res<ImageServices>,
    placeholder: Res<PlaceholderImage>,
) {
    let task_pool = AsyncComputeTaskPool::get();

    for event in events.read() {
        let Some(place) = store.place(event.place) else {
            warn!("Cannot resolve image for missing place {:?}", event.place);
            continue;
        };

        let url = place.image_url.clone();
        let cache = cache.clone();
        let fetcher = services.0.clone();
        let placeholder = placeholder.0.clone();
        let task = task_pool
            .spawn(async move { resolve_image(&cache, &*fetcher, url.as_ref(), &placeholder) });
        commands.spawn(ImageTask {
            place: event.place,
            task,
        });
    }
}

pub fn start_thumbnail_generation(
    mut commands: Commands,
    mut events: MessageReader<ThumbnailRequest>,
    store: Res<PlaceStore>,
    services: Res<SnapshotServices>,
) {
    let task_pool = AsyncComputeTaskPool::get();

    for event in events.read() {
        let Some(place) = store.place(event.place).cloned() else {
            warn!("Cannot snapshot missing place {:?}", event.place);
            continue;
        };

        let snapshotter = services.0.clone();
        let task = task_pool.spawn(async move { generate_thumbnail(&*snapshotter, &place) });
        commands.spawn(ThumbnailTask {
            place: event.place,
            task,
        });
    }
}

pub fn poll_image_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut ImageTask)>,
    store: Res<PlaceStore>,
    mut images: ResMut<PlaceImages>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(image) = future::block_on(future::poll_once(&mut task.task)) {
            if store.place(task.place).is_some() {
                images.images.insert(task.place, image);
            } else {
                debug!("Place {:?} deleted before its image resolved", task.place);
            }
            commands.entity(entity).despawn();
        }
    }
}

pub fn poll_thumbnail_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut ThumbnailTask)>,
    store: Res<PlaceStore>,
    mut thumbnails: ResMut<PlaceThumbnails>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(result) = future::block_on(future::poll_once(&mut task.task)) {
            match result {
                Some(image) if store.place(task.place).is_some() => {
                    thumbnails.thumbnails.insert(task.place, Arc::new(image));
                }
                _ => {
                    thumbnails.thumbnails.remove(&task.place);
                }
            }
            commands.entity(entity).despawn();
        }
    }
}

/// Drop images and thumbnails of deleted places
pub fn forget_deleted_places(
    mut events: MessageReader<PlacesDeleted>,
    mut images: ResMut<PlaceImages>,
    mut thumbnails: ResMut<PlaceThumbnails>,
) {
    for event in events.read() {
        for id in &event.ids {
            images.images.remove(id);
            thumbnails.thumbnails.remove(id);
        }
    }
}
