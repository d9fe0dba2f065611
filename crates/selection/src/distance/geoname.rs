//! Offline geoname reference table.

use stockyard_catalog::LatLng;
use stockyard_core::{DomainError, DomainResult};

use crate::request::AddressRequest;

/// One geoname row: a place with coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GeonameRecord {
    pub country_code: String,
    pub postcode: String,
    pub region: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeonameRecord {
    pub fn latlng(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

/// In-memory geoname reference data with the lookup fallback chain:
/// exact (country, postcode), then city, then region. Exhausting all three is
/// an unresolvable address.
#[derive(Debug, Default)]
pub struct GeonameTable {
    rows: Vec<GeonameRecord>,
}

impl GeonameTable {
    pub fn new(rows: Vec<GeonameRecord>) -> Self {
        Self { rows }
    }

    pub fn find(&self, address: &AddressRequest) -> DomainResult<&GeonameRecord> {
        self.rows
            .iter()
            .find(|r| r.country_code == address.country && r.postcode == address.postcode)
            .or_else(|| self.rows.iter().find(|r| !address.city.is_empty() && r.city == address.city))
            .or_else(|| {
                self.rows
                    .iter()
                    .find(|r| !address.region.is_empty() && r.region == address.region)
            })
            .ok_or_else(|| DomainError::unresolvable_address(address.as_string()))
    }
}
