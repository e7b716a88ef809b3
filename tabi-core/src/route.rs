//! Timed routes returned to callers.

use serde::{Deserialize, Serialize};

use crate::{ClockTime, ConstraintMatrix, PlaceId};

/// One stop of a [`DetailedRoute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    /// Place visited.
    pub place_id: PlaceId,
    /// Arrival time.
    pub arrival_time: ClockTime,
    /// Departure time.
    pub departure_time: ClockTime,
    /// Minutes spent at the place.
    pub visit_duration_min: u32,
    /// Minutes travelled from the previous stop; zero for the first stop.
    pub travel_time_from_prev_min: u32,
    /// Expected crowd level on arrival, between 0 and 1.
    pub crowd_level: f64,
    /// Short advice for this stop.
    pub advisories: Vec<String>,
}

/// Ordered stops with timing, serialised as a plain list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailedRoute {
    /// Stops in visiting order.
    pub stops: Vec<RouteStop>,
}

impl DetailedRoute {
    /// Number of stops.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether the route has no stops.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Place identifiers in visiting order.
    #[must_use]
    pub fn place_ids(&self) -> Vec<&str> {
        self.stops.iter().map(|stop| stop.place_id.as_str()).collect()
    }

    /// Departure time from the final stop.
    #[must_use]
    pub fn end_time(&self) -> Option<ClockTime> {
        self.stops.last().map(|stop| stop.departure_time)
    }

    /// Stop visiting `place_id`, if any.
    #[must_use]
    pub fn stop(&self, place_id: &str) -> Option<&RouteStop> {
        self.stops.iter().find(|stop| stop.place_id == place_id)
    }
}

/// Distance and travel time along an ordering.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteStats {
    /// Kilometres between consecutive stops.
    pub total_distance_km: f64,
    /// Minutes between consecutive stops.
    pub total_travel_minutes: f64,
}

impl RouteStats {
    /// Measure `route` against `constraints`, skipping unknown legs.
    #[must_use]
    pub fn measure(route: &[usize], constraints: &ConstraintMatrix) -> Self {
        let total_travel_minutes = route
            .windows(2)
            .filter_map(|leg| match leg {
                [a, b] => Some(constraints.minutes(*a, *b)),
                _ => None,
            })
            .filter(|minutes| minutes.is_finite())
            .sum();
        Self {
            total_distance_km: constraints.route_distance(route),
            total_travel_minutes,
        }
    }
}
