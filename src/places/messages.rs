//! Message types for place list and editor operations.

use bevy::prelude::*;

use super::form::PlaceForm;
use super::place::{DetailId, PlaceId};

/// Create a new placeholder-named place
#[derive(Message)]
pub struct AddPlaceRequest;

/// Written after [`AddPlaceRequest`] created and committed a place
#[derive(Message, Debug, Clone, Copy)]
pub struct PlaceCreated {
    pub place: PlaceId,
}

#[derive(Message)]
pub struct DeletePlacesRequest {
    pub ids: Vec<PlaceId>,
}

/// Written after places were removed from the store
#[derive(Message, Debug, Clone)]
pub struct PlacesDeleted {
    pub ids: Vec<PlaceId>,
}

#[derive(Message)]
pub struct DeleteDetailsRequest {
    pub ids: Vec<DetailId>,
}

/// Commit the editor's fields to a place
#[derive(Message)]
pub struct SubmitPlaceForm {
    pub place: PlaceId,
    pub form: PlaceForm,
}

/// Fetch time zone and sunrise/sunset for a place
#[derive(Message)]
pub struct EnrichPlaceRequest {
    pub place: PlaceId,
}
