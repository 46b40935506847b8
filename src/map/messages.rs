//! Intents from the map screen.

use bevy::prelude::*;

use crate::coordinates::{CoordinateField, MapRegion};
use crate::places::PlaceId;

/// Bind the map screen to a place
#[derive(Message, Debug, Clone, Copy)]
pub struct LoadPlaceIntoMap {
    pub place: PlaceId,
}

/// The user typed an address and confirmed it
#[derive(Message, Debug, Clone)]
pub struct AddressConfirmed {
    pub text: String,
}

/// The user dragged or pinched the map
#[derive(Message, Debug, Clone, Copy)]
pub struct RegionDragged {
    pub region: MapRegion,
}

/// The user tapped the centre pin
#[derive(Message, Debug, Clone, Copy)]
pub struct PinTapped;

/// The zoom slider moved
#[derive(Message, Debug, Clone, Copy)]
pub struct ZoomChanged {
    pub value: f64,
}

/// A coordinate text field was edited
#[derive(Message, Debug, Clone)]
pub struct CoordinateTextEdited {
    pub field: CoordinateField,
    pub text: String,
}

/// Write the working fields back into the bound place
#[derive(Message, Debug, Clone, Copy)]
pub struct SaveMapPlace;
