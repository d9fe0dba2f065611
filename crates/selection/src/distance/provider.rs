//! Source/destination coordinate resolution with a per-run cache.

use std::collections::HashMap;
use std::sync::Arc;

use stockyard_catalog::{LatLng, Source};
use stockyard_core::DomainResult;

use crate::request::AddressRequest;

use super::geocoder::Geocoder;
use super::geoname::GeonameTable;

/// Transient address-string → coordinates cache.
///
/// Scoped to one selection run: created inside `execute`, dropped with it.
/// Keeps a run from geocoding the same address twice (rate-limit exposure)
/// without ever serving stale coordinates across requests.
#[derive(Debug, Default)]
pub struct GeocodeCache {
    entries: HashMap<String, LatLng>,
}

impl GeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where coordinates come from when an address has to be resolved.
#[derive(Clone)]
pub enum LatLngSource {
    /// External geocoding endpoint (network I/O, hard failures surface).
    Online(Arc<dyn Geocoder>),
    /// Offline geoname reference data with the postcode/city/region fallback.
    Offline(Arc<GeonameTable>),
}

/// Resolves coordinates for sources and destinations.
#[derive(Clone)]
pub struct DistanceProvider {
    latlng_source: LatLngSource,
}

impl DistanceProvider {
    pub fn new(latlng_source: LatLngSource) -> Self {
        Self { latlng_source }
    }

    pub fn online(geocoder: Arc<dyn Geocoder>) -> Self {
        Self::new(LatLngSource::Online(geocoder))
    }

    pub fn offline(geonames: Arc<GeonameTable>) -> Self {
        Self::new(LatLngSource::Offline(geonames))
    }

    /// Resolve an address to coordinates, consulting the run cache first.
    pub fn resolve_address(
        &self,
        cache: &mut GeocodeCache,
        address: &AddressRequest,
    ) -> DomainResult<LatLng> {
        let key = address.as_string();
        if let Some(latlng) = cache.entries.get(&key) {
            return Ok(*latlng);
        }

        let latlng = match &self.latlng_source {
            LatLngSource::Online(geocoder) => geocoder.geocode(&key)?,
            LatLngSource::Offline(geonames) => geonames.find(address)?.latlng(),
        };
        cache.entries.insert(key, latlng);
        Ok(latlng)
    }

    /// Coordinates of a source: the stored pair when present, otherwise its
    /// address resolved like any other.
    pub fn source_latlng(&self, cache: &mut GeocodeCache, source: &Source) -> DomainResult<LatLng> {
        if let Some(latlng) = source.latlng() {
            return Ok(latlng);
        }
        self.resolve_address(cache, &AddressRequest::from_source_address(source.address()))
    }
}
