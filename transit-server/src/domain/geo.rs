//! Great-circle distance and travel-time conversions.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine distance to `other`, in metres.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::GeoPoint;
    ///
    /// let a = GeoPoint::new(-36.8485, 174.7633);
    /// assert_eq!(a.distance_m(&a), 0.0);
    /// ```
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

/// Minutes needed to cover `distance_m` metres at `speed_kmh`.
pub fn travel_minutes(distance_m: f64, speed_kmh: f64) -> f64 {
    distance_m * 60.0 / (speed_kmh * 1000.0)
}
