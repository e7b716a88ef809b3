//! Typed point-of-interest records.
//!
//! Places arrive from the caller's data layer and are validated once, at the
//! start of a run, by [`partition_routable`]. Anything that cannot be routed
//! is set aside as an [`UnroutablePlace`] instead of failing the request.

use std::collections::HashSet;

use geo::Coord;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::{Category, ClockTime};

/// Caller-assigned place identifier.
pub type PlaceId = String;

/// Rating assumed for places that carry none.
pub const DEFAULT_RATING: f64 = 4.0;

/// Highest rating a place may carry.
pub const MAX_RATING: f64 = 5.0;

/// Daily opening window as whole hours, `open` inclusive and `close`
/// exclusive.
///
/// # Examples
/// ```
/// use tabi_core::{ClockTime, OpeningHours};
///
/// let hours = OpeningHours::new(9, 17);
/// assert!(hours.contains(ClockTime::from_hm(16, 59)));
/// assert!(!hours.contains(ClockTime::from_hm(17, 0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpeningHours {
    /// Hour the place opens.
    pub open: u8,
    /// Hour the place closes.
    pub close: u8,
}

impl OpeningHours {
    /// Construct an opening window. Use [`Place::validate`] to check it.
    #[must_use]
    pub const fn new(open: u8, close: u8) -> Self {
        Self { open, close }
    }

    /// Whether the place is open at `time`.
    #[must_use]
    pub const fn contains(&self, time: ClockTime) -> bool {
        let minutes = time.minutes();
        minutes >= self.open as u32 * 60 && minutes < self.close as u32 * 60
    }

    const fn is_valid(&self) -> bool {
        self.open < self.close && self.close <= 24
    }
}

/// A point of interest considered for the day's route.
///
/// Only `id` is mandatory when deserialising; everything else falls back to
/// a neutral default. `location` is written as `{"lat": .., "lng": ..}`.
///
/// # Examples
/// ```
/// use tabi_core::{Category, Place, lat_lng};
///
/// let place = Place::new("sensoji", lat_lng(35.7148, 139.7967))
///     .with_name("Senso-ji")
///     .with_category(Category::Temple)
///     .with_rating(4.6);
/// assert!(place.validate().is_ok());
/// assert!(!place.indoor);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Unique identifier within a request.
    pub id: PlaceId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// WGS84 position; `None` when the data layer has no coordinates.
    #[serde(default, with = "lat_lng_serde")]
    pub location: Option<Coord<f64>>,
    /// Broad category.
    #[serde(default)]
    pub category: Category,
    /// Quality rating between 0 and 5.
    #[serde(default)]
    pub rating: Option<f64>,
    /// Whether the visit happens under cover.
    #[serde(default)]
    pub indoor: bool,
    /// Opening window, if known.
    #[serde(default)]
    pub hours: Option<OpeningHours>,
    /// Average visit duration overriding the category default.
    #[serde(default)]
    pub visit_minutes: Option<u32>,
}

/// Reasons a place cannot take part in routing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaceError {
    /// The identifier was blank.
    #[error("place identifier is empty")]
    EmptyId,
    /// Another place in the request already uses this identifier.
    #[error("place identifier is duplicated")]
    DuplicateId,
    /// No coordinates were supplied.
    #[error("place has no coordinates")]
    MissingLocation,
    /// Coordinates were non-finite or outside WGS84 bounds.
    #[error("coordinate ({lat}, {lng}) is not a valid latitude/longitude")]
    InvalidCoordinate {
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lng: f64,
    },
    /// Rating was non-finite or outside 0 to 5.
    #[error("rating {0} is outside 0..=5")]
    InvalidRating(f64),
    /// Opening window was empty or ran past midnight.
    #[error("opening hours {open}-{close} are not a valid window")]
    InvalidHours {
        /// Opening hour.
        open: u8,
        /// Closing hour.
        close: u8,
    },
}

impl Place {
    /// Create an outdoor place of category [`Category::Other`].
    #[must_use]
    pub fn new(id: impl Into<PlaceId>, location: Coord<f64>) -> Self {
        Self {
            location: Some(location),
            ..Self::without_location(id)
        }
    }

    /// Create a place whose coordinates are unknown.
    #[must_use]
    pub fn without_location(id: impl Into<PlaceId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            location: None,
            category: Category::Other,
            rating: None,
            indoor: false,
            hours: None,
            visit_minutes: None,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the category.
    #[must_use]
    pub const fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the rating.
    #[must_use]
    pub const fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Mark the place as indoor.
    #[must_use]
    pub const fn indoor(mut self) -> Self {
        self.indoor = true;
        self
    }

    /// Set the opening window.
    #[must_use]
    pub const fn with_hours(mut self, open: u8, close: u8) -> Self {
        self.hours = Some(OpeningHours::new(open, close));
        self
    }

    /// Override the visit duration.
    #[must_use]
    pub const fn with_visit_minutes(mut self, minutes: u32) -> Self {
        self.visit_minutes = Some(minutes);
        self
    }

    /// Rating used for scoring, with [`DEFAULT_RATING`] standing in for a
    /// missing value.
    #[must_use]
    pub const fn effective_rating(&self) -> f64 {
        match self.rating {
            Some(rating) => rating,
            None => DEFAULT_RATING,
        }
    }

    /// Check the record and return its coordinate.
    ///
    /// # Errors
    /// Returns a [`PlaceError`] describing the first problem found.
    pub fn validate(&self) -> Result<Coord<f64>, PlaceError> {
        if self.id.trim().is_empty() {
            return Err(PlaceError::EmptyId);
        }
        let location = self.location.ok_or(PlaceError::MissingLocation)?;
        let (lat, lng) = (location.y, location.x);
        if !(lat.is_finite() && lng.is_finite())
            || !(-90.0..=90.0).contains(&lat)
            || !(-180.0..=180.0).contains(&lng)
        {
            return Err(PlaceError::InvalidCoordinate { lat, lng });
        }
        if let Some(rating) = self.rating
            && !(0.0..=MAX_RATING).contains(&rating)
        {
            return Err(PlaceError::InvalidRating(rating));
        }
        if let Some(hours) = self.hours
            && !hours.is_valid()
        {
            return Err(PlaceError::InvalidHours {
                open: hours.open,
                close: hours.close,
            });
        }
        Ok(location)
    }
}

/// A place set aside because it cannot be routed.
#[derive(Debug, Clone, PartialEq)]
pub struct UnroutablePlace {
    /// Identifier of the rejected place.
    pub id: PlaceId,
    /// Why it was rejected.
    pub reason: PlaceError,
}

/// Split `places` into routable places, in input order, and the rest.
///
/// The first occurrence of an identifier wins; later duplicates are
/// rejected.
///
/// # Examples
/// ```
/// use tabi_core::{Place, lat_lng, partition_routable};
///
/// let places = vec![
///     Place::new("a", lat_lng(35.0, 139.0)),
///     Place::without_location("b"),
/// ];
/// let (routable, unroutable) = partition_routable(&places);
/// assert_eq!(routable.len(), 1);
/// assert_eq!(unroutable[0].id, "b");
/// ```
#[must_use]
pub fn partition_routable(places: &[Place]) -> (Vec<Place>, Vec<UnroutablePlace>) {
    let mut seen = HashSet::new();
    let mut routable = Vec::with_capacity(places.len());
    let mut unroutable = Vec::new();
    for place in places {
        let verdict = place.validate().and_then(|_| {
            if seen.insert(place.id.as_str()) {
                Ok(())
            } else {
                Err(PlaceError::DuplicateId)
            }
        });
        match verdict {
            Ok(()) => routable.push(place.clone()),
            Err(reason) => {
                warn!("Place '{}' cannot be routed: {reason}", place.id);
                unroutable.push(UnroutablePlace {
                    id: place.id.clone(),
                    reason,
                });
            }
        }
    }
    (routable, unroutable)
}

mod lat_lng_serde {
    use super::{Coord, Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct LatLng {
        lat: f64,
        lng: f64,
    }

    pub fn serialize<S: Serializer>(
        value: &Option<Coord<f64>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value
            .map(|coord| LatLng {
                lat: coord.y,
                lng: coord.x,
            })
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Coord<f64>>, D::Error> {
        let value = Option::<LatLng>::deserialize(deserializer)?;
        Ok(value.map(|LatLng { lat, lng }| Coord { x: lng, y: lat }))
    }
}
