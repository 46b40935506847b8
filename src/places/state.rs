//! Service resources and background task components for places.

use bevy::prelude::*;
use bevy::tasks::Task;
use std::sync::Arc;

use super::enrichment::{EnrichmentError, EnrichmentService, RiseSet};
use super::place::PlaceId;

/// The remote enrichment service in use
#[derive(Resource, Clone)]
pub struct EnrichmentServices(pub Arc<dyn EnrichmentService>);

/// Background time zone lookup for one place
#[derive(Component)]
pub struct TimeZoneTask {
    pub place: PlaceId,
    pub task: Task<Result<String, EnrichmentError>>,
}

/// Background sunrise/sunset lookup for one place
#[derive(Component)]
pub struct RiseSetTask {
    pub place: PlaceId,
    pub task: Task<Result<RiseSet, EnrichmentError>>,
}
