//! Address → coordinates resolution and distance math.

mod geocoder;
mod geoname;
mod provider;

pub use geocoder::{Geocoder, HttpGeocoder};
pub use geoname::{GeonameRecord, GeonameTable};
pub use provider::{DistanceProvider, GeocodeCache, LatLngSource};

use stockyard_catalog::LatLng;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle (haversine) distance between two coordinates, in meters.
pub fn great_circle_distance_m(from: LatLng, to: LatLng) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlat = (to.lat - from.lat).to_radians();
    let dlng = (to.lng - from.lng).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_M * c
}
