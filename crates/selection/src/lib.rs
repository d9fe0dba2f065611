//! `stockyard-selection` — which sources should fulfill an order.
//!
//! Given a multi-item request and a target stock, allocate the requested
//! quantities across the stock's sources with a pluggable algorithm: walk in
//! priority order, or re-rank by great-circle distance to the destination.
//! Selection is read-only and advisory; deduction re-validates at commit time.

pub mod algorithms;
pub mod distance;
pub mod request;
pub mod result;
pub mod service;

pub use algorithms::{DistanceAlgorithm, PriorityAlgorithm};
pub use distance::{
    DistanceProvider, GeocodeCache, Geocoder, GeonameRecord, GeonameTable, HttpGeocoder,
    LatLngSource, great_circle_distance_m,
};
pub use request::{AddressRequest, InventoryRequest, ItemRequest};
pub use result::{SourceSelectionItem, SourceSelectionResult, UnsatisfiedItem};
pub use service::{SourceSelectionAlgorithm, SourceSelectionService};
