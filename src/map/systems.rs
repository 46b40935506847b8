//! Bevy systems driving the map view-model.

use bevy::prelude::*;
use futures_lite::future;

use crate::assets::ThumbnailRequest;
use crate::coordinates::{Coordinate, CoordinateField};
use crate::geocoding::{GeocodingBridge, spawn_forward, spawn_reverse};
use crate::places::{PlaceStore, fail_on_store_error};

use super::engine::MapSync;
use super::messages::{
    AddressConfirmed, CoordinateTextEdited, LoadPlaceIntoMap, PinTapped, RegionDragged,
    SaveMapPlace, ZoomChanged,
};
use super::state::{ForwardGeocodeTask, ReverseGeocodeTask};

fn start_reverse_lookup(commands: &mut Commands, geocoder: &GeocodingBridge, at: Coordinate) {
    let task = spawn_reverse(geocoder.0.clone(), at);
    commands.spawn(ReverseGeocodeTask(task));
}

pub fn load_place_system(
    mut events: MessageReader<LoadPlaceIntoMap>,
    store: Res<PlaceStore>,
    mut map: ResMut<MapSync>,
) {
    for event in events.read() {
        match store.place(event.place) {
            Some(place) => {
                map.load_place(place);
                debug!("Map bound to {:?}", event.place);
            }
            None => warn!("Cannot show missing place {:?} on the map", event.place),
        }
    }
}

pub fn address_confirmed_system(
    mut commands: Commands,
    mut events: MessageReader<AddressConfirmed>,
    mut map: ResMut<MapSync>,
    geocoder: Res<GeocodingBridge>,
) {
    for event in events.read() {
        map.set_name(event.text.clone());
        if let Some(query) = map.confirm_address() {
            let task = spawn_forward(geocoder.0.clone(), query);
            commands.spawn(ForwardGeocodeTask(task));
        }
    }
}

pub fn region_dragged_system(
    mut commands: Commands,
    mut events: MessageReader<RegionDragged>,
    mut map: ResMut<MapSync>,
    geocoder: Res<GeocodingBridge>,
) {
    for event in events.read() {
        let at = map.drag_region(event.region);
        start_reverse_lookup(&mut commands, &geocoder, at);
    }
}

pub fn pin_tapped_system(
    mut commands: Commands,
    mut events: MessageReader<PinTapped>,
    mut map: ResMut<MapSync>,
    geocoder: Res<GeocodingBridge>,
) {
    for _ in events.read() {
        let at = map.pin_location();
        start_reverse_lookup(&mut commands, &geocoder, at);
    }
}

pub fn zoom_changed_system(
    mut commands: Commands,
    mut events: MessageReader<ZoomChanged>,
    mut map: ResMut<MapSync>,
    geocoder: Res<GeocodingBridge>,
) {
    for event in events.read() {
        let at = map.set_zoom(event.value);
        start_reverse_lookup(&mut commands, &geocoder, at);
    }
}

/// Rejected text is logged by the validator and leaves the field as it was.
pub fn coordinate_text_system(
    mut events: MessageReader<CoordinateTextEdited>,
    mut map: ResMut<MapSync>,
) {
    for event in events.read() {
        let _ = match event.field {
            CoordinateField::Latitude => map.set_latitude_text(&event.text),
            CoordinateField::Longitude => map.set_longitude_text(&event.text),
            CoordinateField::Delta => map.set_delta_text(&event.text),
        };
    }
}

pub fn save_map_place_system(
    mut events: MessageReader<SaveMapPlace>,
    map: Res<MapSync>,
    mut store: ResMut<PlaceStore>,
    mut thumbnails: MessageWriter<ThumbnailRequest>,
    mut exit: MessageWriter<AppExit>,
) {
    for _ in events.read() {
        let Some(id) = map.bound_place() else {
            warn!("Save requested with no place on the map");
            continue;
        };
        let Some(place) = store.place_mut(id) else {
            warn!("Place {:?} was deleted before the map was saved", id);
            continue;
        };
        if map.commit_to(place).is_err() {
            continue;
        }
        fail_on_store_error(store.commit(), &mut exit);
        thumbnails.write(ThumbnailRequest { place: id });
        info!("Saved map changes to {:?}", id);
    }
}

pub fn poll_forward_geocode_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut ForwardGeocodeTask)>,
    mut map: ResMut<MapSync>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(done) = future::block_on(future::poll_once(&mut task.0)) {
            debug!("Forward lookup for {:?} finished", done.query);
            map.apply_forward_result(done.result);
            commands.entity(entity).despawn();
        }
    }
}

pub fn poll_reverse_geocode_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut ReverseGeocodeTask)>,
    mut map: ResMut<MapSync>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(done) = future::block_on(future::poll_once(&mut task.0)) {
            debug!("Reverse lookup for {:?} finished", done.coordinate);
            map.apply_reverse_result(done.result);
            commands.entity(entity).despawn();
        }
    }
}
