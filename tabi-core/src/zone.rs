//! Named geographic clusters used for grouping and curated travel times.
//!
//! A [`ZoneGazetteer`] is plain configuration handed to the constraint
//! builder; nothing here is global. The default gazetteer covers central
//! Tokyo, Kyoto and Osaka.

use std::collections::BTreeMap;

use geo::Coord;

use crate::{Place, PlaceId, distance_km, lat_lng};

/// Zone identifier of the form `city-zone`, for example `tokyo-shibuya`.
pub type ZoneId = String;

/// Identifier returned for coordinates outside every zone.
pub const UNKNOWN_ZONE: &str = "unknown";

/// Default distance from a zone centre within which a point belongs to it.
pub const DEFAULT_ZONE_RADIUS_KM: f64 = 2.0;

/// A named zone centre.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    /// City key, for example `tokyo`.
    pub city: String,
    /// Zone key within the city, for example `shibuya`.
    pub key: String,
    /// Human-readable name.
    pub label: String,
    /// Zone centre.
    pub center: Coord<f64>,
}

impl Zone {
    /// Identifier combining city and zone keys.
    #[must_use]
    pub fn id(&self) -> ZoneId {
        format!("{}-{}", self.city, self.key)
    }
}

/// Zone table plus curated inter-zone travel minutes.
///
/// # Examples
/// ```
/// use tabi_core::{UNKNOWN_ZONE, ZoneGazetteer, lat_lng};
///
/// let zones = ZoneGazetteer::default();
/// assert_eq!(zones.identify(lat_lng(35.6600, 139.7010)), "tokyo-shibuya");
/// assert_eq!(zones.identify(lat_lng(0.0, 0.0)), UNKNOWN_ZONE);
/// assert_eq!(zones.transit_minutes("tokyo-shinjuku", "tokyo-shibuya"), Some(5.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneGazetteer {
    zones: Vec<Zone>,
    radius_km: f64,
    transit: BTreeMap<(ZoneId, ZoneId), f64>,
}

impl ZoneGazetteer {
    /// Create an empty gazetteer with the given membership radius.
    #[must_use]
    pub const fn empty(radius_km: f64) -> Self {
        Self {
            zones: Vec::new(),
            radius_km,
            transit: BTreeMap::new(),
        }
    }

    /// Add a zone centre.
    #[must_use]
    pub fn with_zone(
        mut self,
        city: &str,
        key: &str,
        label: &str,
        center: Coord<f64>,
    ) -> Self {
        self.zones.push(Zone {
            city: city.to_owned(),
            key: key.to_owned(),
            label: label.to_owned(),
            center,
        });
        self
    }

    /// Record a curated travel time between two zones, in either direction.
    #[must_use]
    pub fn with_transit(mut self, a: &str, b: &str, minutes: f64) -> Self {
        self.transit.insert(transit_key(a, b), minutes);
        self
    }

    /// All zones in insertion order.
    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Membership radius in kilometres.
    #[must_use]
    pub const fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Nearest zone whose centre lies strictly within the radius.
    #[must_use]
    pub fn zone_at(&self, coord: Coord<f64>) -> Option<&Zone> {
        self.zones
            .iter()
            .map(|zone| (zone, distance_km(coord, zone.center)))
            .filter(|(_, km)| *km < self.radius_km)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(zone, _)| zone)
    }

    /// Zone identifier for `coord`, or [`UNKNOWN_ZONE`].
    #[must_use]
    pub fn identify(&self, coord: Coord<f64>) -> ZoneId {
        self.zone_at(coord)
            .map_or_else(|| UNKNOWN_ZONE.to_owned(), Zone::id)
    }

    /// Curated minutes between two zones, if known.
    ///
    /// Unknown zones and same-zone pairs have no curated time.
    #[must_use]
    pub fn transit_minutes(&self, a: &str, b: &str) -> Option<f64> {
        if a == UNKNOWN_ZONE || b == UNKNOWN_ZONE || a == b {
            return None;
        }
        self.transit.get(&transit_key(a, b)).copied()
    }

    /// Group places with coordinates by zone, preserving input order within
    /// each group. Places without coordinates are left out.
    #[must_use]
    pub fn cluster_by_zone(&self, places: &[Place]) -> BTreeMap<ZoneId, Vec<PlaceId>> {
        let mut clusters: BTreeMap<ZoneId, Vec<PlaceId>> = BTreeMap::new();
        for place in places {
            if let Some(location) = place.location {
                clusters
                    .entry(self.identify(location))
                    .or_default()
                    .push(place.id.clone());
            }
        }
        clusters
    }
}

fn transit_key(a: &str, b: &str) -> (ZoneId, ZoneId) {
    if a <= b {
        (a.to_owned(), b.to_owned())
    } else {
        (b.to_owned(), a.to_owned())
    }
}

impl Default for ZoneGazetteer {
    fn default() -> Self {
        Self::empty(DEFAULT_ZONE_RADIUS_KM)
            .with_zone("tokyo", "shibuya", "Shibuya", lat_lng(35.6595, 139.7004))
            .with_zone("tokyo", "shinjuku", "Shinjuku", lat_lng(35.6938, 139.7034))
            .with_zone("tokyo", "harajuku", "Harajuku", lat_lng(35.6702, 139.7026))
            .with_zone("tokyo", "asakusa", "Asakusa", lat_lng(35.7148, 139.7967))
            .with_zone("tokyo", "akihabara", "Akihabara", lat_lng(35.7022, 139.7742))
            .with_zone("tokyo", "ueno", "Ueno", lat_lng(35.7141, 139.7773))
            .with_zone("tokyo", "ginza", "Ginza", lat_lng(35.6717, 139.7650))
            .with_zone("tokyo", "roppongi", "Roppongi", lat_lng(35.6627, 139.7300))
            .with_zone("tokyo", "odaiba", "Odaiba", lat_lng(35.6253, 139.7745))
            .with_zone("tokyo", "ikebukuro", "Ikebukuro", lat_lng(35.7295, 139.7109))
            .with_zone("kyoto", "gion", "Gion", lat_lng(35.0037, 135.7751))
            .with_zone("kyoto", "arashiyama", "Arashiyama", lat_lng(35.0093, 135.6739))
            .with_zone("kyoto", "fushimi", "Fushimi Inari", lat_lng(34.9671, 135.7727))
            .with_zone("kyoto", "higashiyama", "Higashiyama", lat_lng(35.0006, 135.7802))
            .with_zone("kyoto", "central", "Central Kyoto", lat_lng(35.0116, 135.7681))
            .with_zone("osaka", "dotonbori", "Dotonbori", lat_lng(34.6686, 135.5004))
            .with_zone("osaka", "osaka_castle", "Osaka Castle", lat_lng(34.6873, 135.5262))
            .with_zone("osaka", "namba", "Namba", lat_lng(34.6661, 135.5009))
            .with_zone("osaka", "umeda", "Umeda", lat_lng(34.7024, 135.4959))
            .with_zone("osaka", "shinsekai", "Shinsekai", lat_lng(34.6522, 135.5063))
            .with_transit("tokyo-shibuya", "tokyo-shinjuku", 5.0)
            .with_transit("tokyo-shibuya", "tokyo-harajuku", 3.0)
            .with_transit("tokyo-shibuya", "tokyo-roppongi", 10.0)
            .with_transit("tokyo-shinjuku", "tokyo-harajuku", 5.0)
            .with_transit("tokyo-shinjuku", "tokyo-ikebukuro", 8.0)
            .with_transit("tokyo-asakusa", "tokyo-akihabara", 7.0)
            .with_transit("tokyo-asakusa", "tokyo-ueno", 5.0)
            .with_transit("tokyo-akihabara", "tokyo-ueno", 3.0)
            .with_transit("tokyo-ginza", "tokyo-shibuya", 15.0)
            .with_transit("kyoto-gion", "kyoto-higashiyama", 5.0)
            .with_transit("kyoto-gion", "kyoto-central", 10.0)
            .with_transit("kyoto-fushimi", "kyoto-gion", 15.0)
            .with_transit("kyoto-arashiyama", "kyoto-central", 25.0)
            .with_transit("osaka-dotonbori", "osaka-namba", 3.0)
            .with_transit("osaka-namba", "osaka-umeda", 10.0)
            .with_transit("osaka-namba", "osaka-shinsekai", 8.0)
            .with_transit("osaka-umeda", "osaka-osaka_castle", 15.0)
    }
}
