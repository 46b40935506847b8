//! Map Synchronization Engine.
//!
//! Keeps four views of "where we are" consistent: the typed working fields,
//! the rendered region, the bound place, and the address name. Each user
//! trigger has one authoritative source:
//!
//! | Trigger | Authority |
//! |---|---|
//! | [`LoadPlaceIntoMap`] | the place record |
//! | [`AddressConfirmed`] | the address text (forward geocode) |
//! | [`RegionDragged`] / [`PinTapped`] | the region (reverse geocode) |
//! | [`ZoomChanged`] | the slider value |
//! | [`CoordinateTextEdited`] | the typed text |
//! | [`SaveMapPlace`] | the working fields |
//!
//! Geocoding runs on the task pool. Overlapping lookups are never
//! cancelled; whichever finishes last wins.

mod engine;
mod messages;
mod state;
mod systems;
mod zoom;


use bevy::prelude::*;

pub use engine::{MapSync, RegionTransition};
pub use messages::{
    AddressConfirmed, CoordinateTextEdited, LoadPlaceIntoMap, PinTapped, RegionDragged,
    SaveMapPlace, ZoomChanged,
};
pub use zoom::{clamp_zoom, delta_to_zoom, zoom_to_delta};

pub struct MapPlugin;

impl Plugin for MapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapSync>()
            .add_message::<LoadPlaceIntoMap>()
            .add_message::<AddressConfirmed>()
            .add_message::<RegionDragged>()
            .add_message::<PinTapped>()
            .add_message::<ZoomChanged>()
            .add_message::<CoordinateTextEdited>()
            .add_message::<SaveMapPlace>()
            .add_systems(
                Update,
                (
                    systems::load_place_system.run_if(on_message::<LoadPlaceIntoMap>),
                    systems::address_confirmed_system.run_if(on_message::<AddressConfirmed>),
                    systems::region_dragged_system.run_if(on_message::<RegionDragged>),
                    systems::pin_tapped_system.run_if(on_message::<PinTapped>),
                    systems::zoom_changed_system.run_if(on_message::<ZoomChanged>),
                    systems::coordinate_text_system.run_if(on_message::<CoordinateTextEdited>),
                    systems::save_map_place_system.run_if(on_message::<SaveMapPlace>),
                    systems::poll_forward_geocode_tasks,
                    systems::poll_reverse_geocode_tasks,
                )
                    .chain(),
            );
    }
}
