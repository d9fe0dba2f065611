//! Source entity: a physical or virtual location holding quantity.

use serde::{Deserialize, Serialize};

use stockyard_core::SourceCode;

/// Geographic coordinates (decimal degrees).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Postal address of a source.
///
/// Every field is optional in practice; sources created administratively often
/// start with only a country. Coordinates are resolved lazily from the address
/// when a distance-based selection first needs them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAddress {
    pub country: String,
    pub region: String,
    pub city: String,
    pub postcode: String,
    pub street: String,
}

impl SourceAddress {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            ..Self::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    pub fn with_postcode(mut self, postcode: impl Into<String>) -> Self {
        self.postcode = postcode.into();
        self
    }

    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street = street.into();
        self
    }
}

/// Entity: Source.
///
/// Identity is the `source_code` and is immutable; attributes are mutated via
/// explicit setters followed by a repository save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    source_code: SourceCode,
    name: String,
    enabled: bool,
    address: SourceAddress,
    latlng: Option<LatLng>,
}

impl Source {
    pub fn new(source_code: SourceCode, name: impl Into<String>) -> Self {
        Self {
            source_code,
            name: name.into(),
            enabled: true,
            address: SourceAddress::default(),
            latlng: None,
        }
    }

    pub fn source_code(&self) -> &SourceCode {
        &self.source_code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn address(&self) -> &SourceAddress {
        &self.address
    }

    /// Stored coordinates, if the source has been geocoded (or entered manually).
    pub fn latlng(&self) -> Option<LatLng> {
        self.latlng
    }

    pub fn with_address(mut self, address: SourceAddress) -> Self {
        self.address = address;
        self
    }

    pub fn with_latlng(mut self, latlng: LatLng) -> Self {
        self.latlng = Some(latlng);
        self
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_latlng(&mut self, latlng: LatLng) {
        self.latlng = Some(latlng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_code(code: &str) -> SourceCode {
        SourceCode::new(code).unwrap()
    }

    #[test]
    fn new_source_is_enabled_without_coordinates() {
        let source = Source::new(test_code("eu-1"), "EU Warehouse");
        assert!(source.is_enabled());
        assert!(source.latlng().is_none());
        assert_eq!(source.name(), "EU Warehouse");
    }

    #[test]
    fn identity_survives_attribute_updates() {
        let mut source = Source::new(test_code("eu-1"), "EU Warehouse")
            .with_address(SourceAddress::new("DE").with_city("Berlin"))
            .with_latlng(LatLng::new(52.52, 13.40));

        source.set_name("EU Central");
        source.set_enabled(false);

        assert_eq!(source.source_code().as_str(), "eu-1");
        assert_eq!(source.name(), "EU Central");
        assert!(!source.is_enabled());
        assert_eq!(source.latlng(), Some(LatLng::new(52.52, 13.40)));
        assert_eq!(source.address().city, "Berlin");
    }
}
