// google.rs
use crate::domain::LatLng;
use crate::geocoding::models::GeocodeResponse;
use crate::geocoding::{GeocodeError, Geocoder, ReverseMatch};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, warn};

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

pub struct GoogleGeocoder {
    client: Client,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, GeocodeError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeocodeError::Config("empty API key".into()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        Ok(Self { client, api_key })
    }

    fn fetch(&self, query: &[(&str, String)]) -> Result<GeocodeResponse, GeocodeError> {
        let resp = self
            .client
            .get(GEOCODE_URL)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(GeocodeError::Network(format!("HTTP {status}: {text}")));
        }

        parse_response(&text)
    }
}

impl Geocoder for GoogleGeocoder {
    fn reverse(&self, point: LatLng) -> Result<Option<ReverseMatch>, GeocodeError> {
        debug!("reverse geocoding {},{}", point.lat(), point.lng());
        let resp = self.fetch(&[("latlng", format!("{},{}", point.lat(), point.lng()))])?;
        best_reverse_match(resp)
    }

    fn forward(&self, address: &str) -> Result<Option<LatLng>, GeocodeError> {
        debug!("forward geocoding {address:?}");
        let resp = self.fetch(&[("address", address.to_string())])?;
        first_location(resp)
    }
}

fn parse_response(text: &str) -> Result<GeocodeResponse, GeocodeError> {
    serde_json::from_str(text).map_err(|e| GeocodeError::JsonParse(e.to_string()))
}

/// `true` when the provider found something, `false` for ZERO_RESULTS.
fn check_status(resp: &GeocodeResponse) -> Result<bool, GeocodeError> {
    match resp.status.as_str() {
        "OK" => Ok(!resp.results.is_empty()),
        "ZERO_RESULTS" => Ok(false),
        other => {
            let message = resp.error_message.clone().unwrap_or_default();
            warn!("⚠️ Geocoder refused request: {other} {message}");
            Err(GeocodeError::Status {
                status: other.to_string(),
                message,
            })
        }
    }
}

/// Several candidates come back for most points; the first is the provider's best.
fn best_reverse_match(
    resp: GeocodeResponse,
) -> Result<Option<ReverseMatch>, GeocodeError> {
    if !check_status(&resp)? {
        return Ok(None);
    }
    let Some(best) = resp.results.into_iter().next() else {
        return Ok(None);
    };

    Ok(Some(ReverseMatch {
        state: best.component("administrative_area_level_1"),
        city: best.component("locality"),
        street: best.component("route"),
        formatted_address: best
            .formatted_address
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| "Selected location".to_string()),
        place_id: best.place_id.unwrap_or_default(),
    }))
}

fn first_location(resp: GeocodeResponse) -> Result<Option<LatLng>, GeocodeError> {
    if !check_status(&resp)? {
        return Ok(None);
    }
    let location = resp
        .results
        .into_iter()
        .next()
        .and_then(|r| r.geometry)
        .map(|g| g.location);

    match location {
        Some(loc) => LatLng::new(loc.lat, loc.lng)
            .map(Some)
            .map_err(|e| GeocodeError::JsonParse(e.to_string())),
        None => Ok(None),
    }
}
