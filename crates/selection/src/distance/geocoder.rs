//! HTTP geocoding client.

use serde::Deserialize;

use stockyard_catalog::LatLng;
use stockyard_core::{DomainError, DomainResult};

/// Turns an address string into coordinates.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> DomainResult<LatLng>;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// Geocoder backed by an HTTP endpoint taking `key` and `address` query
/// parameters and answering `{"status":"OK","results":[...]}`.
///
/// Non-200 responses and non-"OK" body statuses are hard failures, never a
/// default distance. The request blocks; callers must not hold any
/// ledger/quantity lock while geocoding.
pub struct HttpGeocoder {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl HttpGeocoder {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

impl Geocoder for HttpGeocoder {
    fn geocode(&self, address: &str) -> DomainResult<LatLng> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("key", self.api_key.as_str()), ("address", address)])
            .send()
            .map_err(|e| DomainError::external_service(format!("geocoding request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::external_service(format!(
                "geocoding endpoint returned HTTP {status}"
            )));
        }

        let body: GeocodeResponse = response.json().map_err(|e| {
            DomainError::external_service(format!("malformed geocoding response: {e}"))
        })?;
        if body.status != "OK" {
            return Err(DomainError::external_service(format!(
                "unable to geocode address '{address}' (status {})",
                body.status
            )));
        }

        let location = body
            .results
            .first()
            .map(|r| &r.geometry.location)
            .ok_or_else(|| {
                DomainError::external_service(format!(
                    "empty geocoding result for address '{address}'"
                ))
            })?;
        Ok(LatLng::new(location.lat, location.lng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_model_parses_the_wire_shape() {
        let raw = r#"{
            "status": "OK",
            "results": [
                {"geometry": {"location": {"lat": 52.52, "lng": 13.405}}}
            ]
        }"#;
        let parsed: GeocodeResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.status, "OK");
        assert_eq!(parsed.results[0].geometry.location.lat, 52.52);
        assert_eq!(parsed.results[0].geometry.location.lng, 13.405);
    }

    #[test]
    fn zero_results_body_still_parses() {
        let raw = r#"{"status": "ZERO_RESULTS"}"#;
        let parsed: GeocodeResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.status, "ZERO_RESULTS");
        assert!(parsed.results.is_empty());
    }
}
