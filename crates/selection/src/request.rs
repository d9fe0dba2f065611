//! Selection request types. Ephemeral; never persisted.

use serde::{Deserialize, Serialize};

use stockyard_catalog::SourceAddress;
use stockyard_core::{Qty, Sku, StockId};

/// One requested line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRequest {
    pub sku: Sku,
    pub qty: Qty,
}

impl ItemRequest {
    pub fn new(sku: Sku, qty: Qty) -> Self {
        Self { sku, qty }
    }
}

/// Destination address for distance-based ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRequest {
    pub country: String,
    pub region: String,
    pub city: String,
    pub postcode: String,
    pub street: String,
}

impl AddressRequest {
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

    /// A source's stored address, viewed as a geocodable request.
    pub fn from_source_address(address: &SourceAddress) -> Self {
        Self {
            country: address.country.clone(),
            region: address.region.clone(),
            city: address.city.clone(),
            postcode: address.postcode.clone(),
            street: address.street.clone(),
        }
    }

    /// Canonical string form: the geocoding query and the cache key.
    pub fn as_string(&self) -> String {
        [
            self.street.as_str(),
            self.city.as_str(),
            self.region.as_str(),
            self.postcode.as_str(),
            self.country.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<&str>>()
        .join(", ")
    }
}

/// A batch of (sku, qty) lines to allocate on one stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRequest {
    pub stock_id: StockId,
    pub items: Vec<ItemRequest>,
    /// Required by distance-based algorithms, ignored by priority.
    pub destination: Option<AddressRequest>,
}

impl InventoryRequest {
    pub fn new(stock_id: StockId, items: Vec<ItemRequest>) -> Self {
        Self {
            stock_id,
            items,
            destination: None,
        }
    }

    pub fn with_destination(mut self, destination: AddressRequest) -> Self {
        self.destination = Some(destination);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_string_joins_non_empty_parts() {
        let address = AddressRequest::new("DE")
            .with_city("Berlin")
            .with_postcode("10115");
        assert_eq!(address.as_string(), "Berlin, 10115, DE");
    }

    #[test]
    fn as_string_with_all_parts_orders_street_first() {
        let address = AddressRequest::new("FR")
            .with_region("IDF")
            .with_city("Paris")
            .with_postcode("75001")
            .with_street("1 Rue de Rivoli");
        assert_eq!(address.as_string(), "1 Rue de Rivoli, Paris, IDF, 75001, FR");
    }

    #[test]
    fn request_defaults_to_no_destination() {
        let request = InventoryRequest::new(StockId::new(1), vec![]);
        assert!(request.destination.is_none());
    }
}
