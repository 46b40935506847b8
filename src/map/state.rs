//! In-flight geocoding lookups started by the map screen.

use bevy::prelude::*;
use bevy::tasks::Task;

use crate::geocoding::{ForwardGeocodeResult, ReverseGeocodeResult};

#[derive(Component)]
pub struct ForwardGeocodeTask(pub Task<ForwardGeocodeResult>);

#[derive(Component)]
pub struct ReverseGeocodeTask(pub Task<ReverseGeocodeResult>);
