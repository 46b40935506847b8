//! Bevy systems for place CRUD, form submission and enrichment.

use bevy::prelude::*;
use bevy::tasks::AsyncComputeTaskPool;
use futures_lite::future;
use std::sync::Arc;

use crate::assets::ResolveImageRequest;
use crate::config::AppConfig;
use crate::constants::NEW_PLACE_NAME;

use super::enrichment::{EnrichmentError, HttpEnrichmentService, RiseSet};
use super::messages::{
    AddPlaceRequest, DeleteDetailsRequest, DeletePlacesRequest, EnrichPlaceRequest, PlaceCreated,
    PlacesDeleted, SubmitPlaceForm,
};
use super::place::PlaceId;
use super::state::{EnrichmentServices, RiseSetTask, TimeZoneTask};
use super::store::{PlaceStore, StoreError};

/// Persistence failures are unrecoverable: log and shut the app down.
pub fn fail_on_store_error(result: Result<(), StoreError>, exit: &mut MessageWriter<AppExit>) {
    if let Err(e) = result {
        error!("Error occurred while saving: {}", e);
        exit.write(AppExit::error());
    }
}

/// Startup system that opens the store named by the config
pub fn open_store_system(
    mut commands: Commands,
    config: Res<AppConfig>,
    mut exit: MessageWriter<AppExit>,
) {
    let path = config.data.store_path();
    match PlaceStore::open(&path) {
        Ok(store) => {
            info!(
                "Opened place store {:?} ({} places)",
                path,
                store.place_count()
            );
            commands.insert_resource(store);
        }
        Err(e) => {
            // Leave the in-memory store in place so nothing overwrites the file
            error!("Failed to load place store: {}", e);
            exit.write(AppExit::error());
        }
    }
}

/// Startup system that installs the HTTP enrichment service
pub fn setup_enrichment_service(mut commands: Commands, config: Res<AppConfig>) {
    let service = HttpEnrichmentService::new(&config.data.services);
    commands.insert_resource(EnrichmentServices(Arc::new(service)));
}

pub fn add_place_system(
    mut events: MessageReader<AddPlaceRequest>,
    mut store: ResMut<PlaceStore>,
    mut created: MessageWriter<PlaceCreated>,
    mut exit: MessageWriter<AppExit>,
) {
    for _ in events.read() {
        let id = store.create_place();
        if let Some(place) = store.place_mut(id) {
            place.set_name(NEW_PLACE_NAME);
        }
        fail_on_store_error(store.commit(), &mut exit);
        created.write(PlaceCreated { place: id });
        info!("Added place {:?}", id);
    }
}

pub fn delete_places_system(
    mut events: MessageReader<DeletePlacesRequest>,
    mut store: ResMut<PlaceStore>,
    mut deleted: MessageWriter<PlacesDeleted>,
    mut exit: MessageWriter<AppExit>,
) {
    for event in events.read() {
        let removed: Vec<PlaceId> = event
            .ids
            .iter()
            .copied()
            .filter(|id| store.delete_place(*id))
            .collect();
        fail_on_store_error(store.commit(), &mut exit);
        info!("Deleted {} place(s)", removed.len());
        if !removed.is_empty() {
            deleted.write(PlacesDeleted { ids: removed });
        }
    }
}

pub fn delete_details_system(
    mut events: MessageReader<DeleteDetailsRequest>,
    mut store: ResMut<PlaceStore>,
    mut exit: MessageWriter<AppExit>,
) {
    for event in events.read() {
        let removed = event
            .ids
            .iter()
            .filter(|id| store.delete_detail(**id))
            .count();
        fail_on_store_error(store.commit(), &mut exit);
        debug!("Deleted {} detail(s)", removed);
    }
}

pub fn submit_place_form_system(
    mut events: MessageReader<SubmitPlaceForm>,
    mut store: ResMut<PlaceStore>,
    mut images: MessageWriter<ResolveImageRequest>,
    mut exit: MessageWriter<AppExit>,
) {
    for event in events.read() {
        match event.form.apply(&mut store, event.place) {
            Ok(true) => {
                images.write(ResolveImageRequest { place: event.place });
            }
            Ok(false) => warn!("Form submitted for missing place {:?}", event.place),
            Err(e) => fail_on_store_error(Err(e), &mut exit),
        }
    }
}

/// Fire off the time zone and sunrise/sunset lookups for a place, and
/// refresh its image
pub fn start_enrichment_system(
    mut commands: Commands,
    mut events: MessageReader<EnrichPlaceRequest>,
    store: Res<PlaceStore>,
    services: Res<EnrichmentServices>,
    mut images: MessageWriter<ResolveImageRequest>,
) {
    let task_pool = AsyncComputeTaskPool::get();

    for event in events.read() {
        let Some(place) = store.place(event.place) else {
            warn!("Cannot enrich missing place {:?}", event.place);
            continue;
        };
        let coordinate = place.coordinate();

        let service = services.0.clone();
        let task = task_pool.spawn(async move { service.time_zone(coordinate) });
        commands.spawn(TimeZoneTask {
            place: event.place,
            task,
        });

        let service = services.0.clone();
        let task = task_pool.spawn(async move { service.rise_set(coordinate) });
        commands.spawn(RiseSetTask {
            place: event.place,
            task,
        });

        images.write(ResolveImageRequest { place: event.place });
    }
}

/// Write a finished time zone lookup into the place. Returns true if the
/// record changed.
pub fn apply_time_zone(
    store: &mut PlaceStore,
    id: PlaceId,
    result: Result<String, EnrichmentError>,
) -> bool {
    match result {
        Ok(time_zone) => match store.place_mut(id) {
            Some(place) => {
                place.timezone = Some(time_zone);
                true
            }
            None => {
                debug!("Place {:?} deleted before time zone arrived", id);
                false
            }
        },
        Err(e) => {
            warn!("Time zone lookup failed for {:?}: {}", id, e);
            false
        }
    }
}

/// Write a finished sunrise/sunset lookup into the place. Returns true if
/// the record changed.
pub fn apply_rise_set(
    store: &mut PlaceStore,
    id: PlaceId,
    result: Result<RiseSet, EnrichmentError>,
) -> bool {
    match result {
        Ok(rise_set) => match store.place_mut(id) {
            Some(place) => {
                place.sunrise = Some(rise_set.sunrise);
                place.sunset = Some(rise_set.sunset);
                true
            }
            None => {
                debug!("Place {:?} deleted before sunrise/sunset arrived", id);
                false
            }
        },
        Err(e) => {
            warn!("Sunrise/sunset lookup failed for {:?}: {}", id, e);
            false
        }
    }
}

pub fn poll_time_zone_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut TimeZoneTask)>,
    mut store: ResMut<PlaceStore>,
    mut exit: MessageWriter<AppExit>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(result) = future::block_on(future::poll_once(&mut task.task)) {
            if apply_time_zone(&mut store, task.place, result) {
                fail_on_store_error(store.commit(), &mut exit);
            }
            commands.entity(entity).despawn();
        }
    }
}

pub fn poll_rise_set_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut RiseSetTask)>,
    mut store: ResMut<PlaceStore>,
    mut exit: MessageWriter<AppExit>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(result) = future::block_on(future::poll_once(&mut task.task)) {
            if apply_rise_set(&mut store, task.place, result) {
                fail_on_store_error(store.commit(), &mut exit);
            }
            commands.entity(entity).despawn();
        }
    }
}
