//! Place records, the durable store, and the operations the list and
//! editor screens drive.
//!
//! ## Module Structure
//!
//! - [`place`] - `Place`/`Detail` records and their validated text views
//! - [`store`] - `PlaceStore` resource with atomic JSON commits
//! - [`form`] - batch field commit from the editor
//! - [`enrichment`] - time zone and sunrise/sunset remote lookups
//! - [`time`] - GMT to local time-of-day conversion
//! - [`systems`] - message handlers and task polling

mod enrichment;
mod form;
mod messages;
mod place;
mod state;
mod store;
mod systems;
mod time;

#[cfg(test)]
mod tests;

use bevy::prelude::*;

use crate::config::ConfigLoaded;

pub use enrichment::{
    EnrichmentError, EnrichmentService, HttpEnrichmentService, RiseSet, parse_rise_set,
    parse_time_zone,
};
pub use form::PlaceForm;
pub use messages::{
    AddPlaceRequest, DeleteDetailsRequest, DeletePlacesRequest, EnrichPlaceRequest, PlaceCreated,
    PlacesDeleted, SubmitPlaceForm,
};
pub use place::{Detail, DetailId, Place, PlaceId};
pub use state::{EnrichmentServices, RiseSetTask, TimeZoneTask};
pub use store::{PlaceStore, StoreError};
pub use systems::{apply_rise_set, apply_time_zone, fail_on_store_error};
pub use time::convert_time_zone;

pub struct PlacesPlugin;

impl Plugin for PlacesPlugin {
    fn build(&self, app: &mut App) {
        // Replaced by the configured store at startup
        app.insert_resource(PlaceStore::in_memory())
            .add_message::<AddPlaceRequest>()
            .add_message::<PlaceCreated>()
            .add_message::<DeletePlacesRequest>()
            .add_message::<PlacesDeleted>()
            .add_message::<DeleteDetailsRequest>()
            .add_message::<SubmitPlaceForm>()
            .add_message::<EnrichPlaceRequest>()
            .add_systems(
                Startup,
                (
                    systems::open_store_system,
                    systems::setup_enrichment_service,
                )
                    .after(ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    systems::add_place_system.run_if(on_message::<AddPlaceRequest>),
                    systems::delete_places_system.run_if(on_message::<DeletePlacesRequest>),
                    systems::delete_details_system.run_if(on_message::<DeleteDetailsRequest>),
                    systems::submit_place_form_system.run_if(on_message::<SubmitPlaceForm>),
                    systems::start_enrichment_system.run_if(on_message::<EnrichPlaceRequest>),
                    systems::poll_time_zone_tasks,
                    systems::poll_rise_set_tasks,
                ),
            );
    }
}
