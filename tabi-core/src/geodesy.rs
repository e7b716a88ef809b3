//! Great-circle distance and travel-time estimation.
//!
//! Coordinates are WGS84 [`Coord`] values with `x = longitude` and
//! `y = latitude`, in degrees. Inputs are assumed finite; validation happens
//! once when places are ingested.

use geo::Coord;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Mixed transit and walking speed used when no curated time exists.
pub const DEFAULT_SPEED_KMH: f64 = 30.0;

/// Build a coordinate from latitude and longitude.
///
/// # Examples
/// ```
/// use tabi_core::lat_lng;
///
/// let shibuya = lat_lng(35.6595, 139.7004);
/// assert_eq!(shibuya.y, 35.6595);
/// ```
#[must_use]
pub const fn lat_lng(lat: f64, lng: f64) -> Coord<f64> {
    Coord { x: lng, y: lat }
}

/// Haversine distance between two coordinates in kilometres.
///
/// # Examples
/// ```
/// use tabi_core::{distance_km, lat_lng};
///
/// let shibuya = lat_lng(35.6595, 139.7004);
/// let shinjuku = lat_lng(35.6938, 139.7034);
/// let km = distance_km(shibuya, shinjuku);
/// assert!((km - 3.8).abs() < 0.1);
/// ```
#[must_use]
pub fn distance_km(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let d_lat = (b.y - a.y).to_radians();
    let d_lng = (b.x - a.x).to_radians();
    let h = ((d_lat / 2.0).sin().powi(2)
        + a.y.to_radians().cos() * b.y.to_radians().cos() * (d_lng / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Converts distances into travel minutes at a fixed average speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelModel {
    /// Average door-to-door speed in km/h.
    pub average_speed_kmh: f64,
}

impl Default for TravelModel {
    fn default() -> Self {
        Self {
            average_speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl TravelModel {
    /// Minutes needed to cover `km` kilometres.
    #[must_use]
    pub fn minutes_for(&self, km: f64) -> f64 {
        km / self.average_speed_kmh * 60.0
    }
}

/// Travel minutes for `km` kilometres at the default 30 km/h.
///
/// # Examples
/// ```
/// use tabi_core::travel_time_minutes;
///
/// assert_eq!(travel_time_minutes(15.0), 30.0);
/// ```
#[must_use]
pub fn travel_time_minutes(km: f64) -> f64 {
    TravelModel::default().minutes_for(km)
}
