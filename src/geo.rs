// src/geo.rs
use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters (IUGG), the value most geo libraries use.
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;
pub const METERS_PER_KILOMETER: f64 = 1000.0;

/// A longitude/latitude pair in degrees, in GeoJSON order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lon: f64,
    pub lat: f64,
}

impl Point {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &Point) -> f64 {
        haversine_meters(self, other)
    }
}

/// Haversine distance between two points in meters.
pub fn haversine_meters(a: &Point, b: &Point) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for near-antipodal points.
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// Point `meters` due north of `from`.
#[cfg(test)]
pub(crate) fn offset_north(from: &Point, meters: f64) -> Point {
    let dlat = (meters / EARTH_RADIUS_METERS).to_degrees();
    Point::new(from.lon, from.lat + dlat)
}
