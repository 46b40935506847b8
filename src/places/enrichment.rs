//! Background enrichment of a place: time zone and sunrise/sunset lookups.

use serde::Deserialize;
use thiserror::Error;

use crate::config::ServiceEndpoints;
use crate::coordinates::Coordinate;
use crate::net::{HttpClient, NetError};

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error(transparent)]
    Net(#[from] NetError),
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Sunrise and sunset as reported by the remote service (GMT).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RiseSet {
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Deserialize)]
struct RiseSetResponse {
    results: Option<RiseSet>,
}

#[derive(Debug, Deserialize)]
struct TimeZoneResponse {
    #[serde(rename = "timeZone")]
    time_zone: Option<String>,
}

/// Parse a `{results: {sunrise, sunset}}` body.
pub fn parse_rise_set(json: &str) -> Result<RiseSet, EnrichmentError> {
    let response: RiseSetResponse =
        serde_json::from_str(json).map_err(|e| EnrichmentError::Malformed(e.to_string()))?;
    into_rise_set(response)
}

fn into_rise_set(response: RiseSetResponse) -> Result<RiseSet, EnrichmentError> {
    response
        .results
        .filter(|r| !r.sunrise.is_empty() && !r.sunset.is_empty())
        .ok_or_else(|| EnrichmentError::Malformed("missing sunrise/sunset".to_string()))
}

/// Parse a `{timeZone}` body.
pub fn parse_time_zone(json: &str) -> Result<String, EnrichmentError> {
    let response: TimeZoneResponse =
        serde_json::from_str(json).map_err(|e| EnrichmentError::Malformed(e.to_string()))?;
    into_time_zone(response)
}

fn into_time_zone(response: TimeZoneResponse) -> Result<String, EnrichmentError> {
    response
        .time_zone
        .filter(|tz| !tz.is_empty())
        .ok_or_else(|| EnrichmentError::Malformed("missing timeZone".to_string()))
}

/// Remote lookups keyed by coordinate. Calls block; run them on a task pool.
pub trait EnrichmentService: Send + Sync {
    fn time_zone(&self, coordinate: Coordinate) -> Result<String, EnrichmentError>;
    fn rise_set(&self, coordinate: Coordinate) -> Result<RiseSet, EnrichmentError>;
}

pub struct HttpEnrichmentService {
    client: HttpClient,
    sunrise_url: String,
    timezone_url: String,
}

impl HttpEnrichmentService {
    pub fn new(endpoints: &ServiceEndpoints) -> Self {
        Self {
            client: HttpClient::new(&endpoints.user_agent),
            sunrise_url: endpoints.sunrise_url.clone(),
            timezone_url: endpoints.timezone_url.clone(),
        }
    }
}

impl EnrichmentService for HttpEnrichmentService {
    fn time_zone(&self, coordinate: Coordinate) -> Result<String, EnrichmentError> {
        let latitude = coordinate.latitude.to_string();
        let longitude = coordinate.longitude.to_string();
        let response: TimeZoneResponse = self.client.get_json(
            &self.timezone_url,
            &[("latitude", latitude.as_str()), ("longitude", longitude.as_str())],
        )?;
        into_time_zone(response)
    }

    fn rise_set(&self, coordinate: Coordinate) -> Result<RiseSet, EnrichmentError> {
        let latitude = coordinate.latitude.to_string();
        let longitude = coordinate.longitude.to_string();
        let response: RiseSetResponse = self.client.get_json(
            &self.sunrise_url,
            &[("lat", latitude.as_str()), ("lng", longitude.as_str()), ("timezone", "UTC")],
        )?;
        into_rise_set(response)
    }
}
