//! Geocoder backed by a Nominatim-compatible HTTP service (`format=jsonv2`).

use serde::Deserialize;

use crate::config::ServiceEndpoints;
use crate::coordinates::Coordinate;
use crate::net::HttpClient;

use super::{GeocodeError, Geocoder, Placemark};

#[derive(Debug, Deserialize)]
pub(super) struct SearchHit {
    lat: String,
    lon: String,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ReverseAddress {
    country: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ReverseResponse {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<ReverseAddress>,
    /// Set instead of the other fields when nothing is at the location
    #[serde(default)]
    error: Option<String>,
}

/// Take the first search hit as the answer.
pub(super) fn first_hit(hits: Vec<SearchHit>) -> Result<Option<Coordinate>, GeocodeError> {
    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };
    let latitude = hit
        .lat
        .parse()
        .map_err(|_| GeocodeError::Malformed(format!("latitude {:?}", hit.lat)))?;
    let longitude = hit
        .lon
        .parse()
        .map_err(|_| GeocodeError::Malformed(format!("longitude {:?}", hit.lon)))?;
    Ok(Some(Coordinate::new(latitude, longitude)))
}

pub(super) fn into_placemark(response: ReverseResponse) -> Option<Placemark> {
    if response.error.is_some() {
        return None;
    }
    let address = response.address.unwrap_or_default();
    Some(Placemark {
        name: response.name.filter(|n| !n.is_empty()),
        country: address.country,
        locality: address.city.or(address.town).or(address.village),
        admin_area: address.state,
    })
}

pub struct NominatimGeocoder {
    client: HttpClient,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(endpoints: &ServiceEndpoints) -> Self {
        Self {
            client: HttpClient::new(&endpoints.user_agent),
            base_url: endpoints.geocoder_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Geocoder for NominatimGeocoder {
    fn forward(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        let hits: Vec<SearchHit> = self.client.get_json(
            &url,
            &[("q", address), ("format", "jsonv2"), ("limit", "1")],
        )?;
        first_hit(hits)
    }

    fn reverse(&self, coordinate: Coordinate) -> Result<Option<Placemark>, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);
        let latitude = coordinate.latitude.to_string();
        let longitude = coordinate.longitude.to_string();
        let response: ReverseResponse = self.client.get_json(
            &url,
            &[
                ("lat", latitude.as_str()),
                ("lon", longitude.as_str()),
                ("format", "jsonv2"),
            ],
        )?;
        Ok(into_placemark(response))
    }
}
