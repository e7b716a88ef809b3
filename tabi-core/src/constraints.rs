//! Per-run constraint matrices.
//!
//! [`ConstraintBuilder`] turns the routable places of one request, plus the
//! gathered [`Conditions`], into a [`ConstraintMatrix`]. The matrix is owned
//! by a single run and never shared.

use chrono::NaiveDate;
use log::{debug, warn};

use crate::crowd::{HourlyCrowd, NEUTRAL_CROWD};
use crate::{
    Conditions, CrowdModel, DataSource, HeuristicCrowdModel, Place, SquareMatrix, TravelModel,
    ZoneGazetteer, ZoneId, distance_km,
};

/// Suitability of a place when weather does not matter.
pub const FULL_SUITABILITY: f64 = 1.0;

/// Distance, time, weather and crowd inputs for one run.
///
/// Every per-place vector has one entry per place passed to
/// [`ConstraintBuilder::build`], in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintMatrix {
    /// Great-circle distances in kilometres; infinite when either place has
    /// no coordinates.
    pub distance_km: SquareMatrix,
    /// Travel minutes, curated between known zones and distance-derived
    /// otherwise.
    pub travel_minutes: SquareMatrix,
    /// Weather suitability between 0 and 1.
    pub suitability: Vec<f64>,
    /// Mean crowd level over the visiting window.
    pub crowd: Vec<f64>,
    /// Hourly crowd curve when the model produced one.
    pub hourly_crowd: Vec<Option<HourlyCrowd>>,
    /// Zone of each place.
    pub zones: Vec<ZoneId>,
    /// Data sources that fell back to neutral defaults.
    pub missing: Vec<DataSource>,
}

impl ConstraintMatrix {
    /// Number of places covered.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.suitability.len()
    }

    /// Distance from `i` to `j`; infinite for unknown indices.
    #[must_use]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distance_km.at(i, j)
    }

    /// Travel minutes from `i` to `j`; infinite for unknown indices.
    #[must_use]
    pub fn minutes(&self, i: usize, j: usize) -> f64 {
        self.travel_minutes.at(i, j)
    }

    /// Weather suitability of place `i`, neutral when unknown.
    #[must_use]
    pub fn suitability_of(&self, i: usize) -> f64 {
        self.suitability.get(i).copied().unwrap_or(FULL_SUITABILITY)
    }

    /// Mean crowd level of place `i`, neutral when unknown.
    #[must_use]
    pub fn crowd_of(&self, i: usize) -> f64 {
        self.crowd.get(i).copied().unwrap_or(NEUTRAL_CROWD)
    }

    /// Crowd level of place `i` at `hour`, neutral when the place has no
    /// curve. Hours off the curve read its nearest end.
    #[must_use]
    pub fn crowd_at(&self, i: usize, hour: u32) -> f64 {
        self.hourly_crowd
            .get(i)
            .copied()
            .flatten()
            .map_or(NEUTRAL_CROWD, |curve| curve.nearest_hour(hour))
    }

    /// Total distance along `route`, ignoring legs with unknown distance.
    #[must_use]
    pub fn route_distance(&self, route: &[usize]) -> f64 {
        route
            .windows(2)
            .filter_map(|leg| match leg {
                [a, b] => Some(self.distance(*a, *b)),
                _ => None,
            })
            .filter(|km| km.is_finite())
            .sum()
    }
}

/// Builds [`ConstraintMatrix`] values from places and gathered conditions.
///
/// Configuration is fixed at construction; each call to
/// [`ConstraintBuilder::build`] is independent.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use tabi_core::{Conditions, ConstraintBuilder, Place, lat_lng};
///
/// let places = vec![
///     Place::new("shibuya", lat_lng(35.6595, 139.7004)),
///     Place::new("shinjuku", lat_lng(35.6938, 139.7034)),
/// ];
/// let date = NaiveDate::from_ymd_opt(2025, 6, 4).expect("valid date");
/// let matrix = ConstraintBuilder::default().build(&places, date, &Conditions::neutral());
/// assert_eq!(matrix.size(), 2);
/// assert_eq!(matrix.minutes(0, 1), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintBuilder<M = HeuristicCrowdModel> {
    travel: TravelModel,
    zones: ZoneGazetteer,
    crowd_model: M,
    visiting_window: (u32, u32),
    rain_penalty: f64,
}

impl Default for ConstraintBuilder<HeuristicCrowdModel> {
    fn default() -> Self {
        Self::new(HeuristicCrowdModel::default())
    }
}

impl<M> ConstraintBuilder<M> {
    /// Builder using `crowd_model` and default travel, zone and weather
    /// settings.
    #[must_use]
    pub fn new(crowd_model: M) -> Self {
        Self {
            travel: TravelModel::default(),
            zones: ZoneGazetteer::default(),
            crowd_model,
            visiting_window: (10, 17),
            rain_penalty: 0.7,
        }
    }

    /// Replace the travel model.
    #[must_use]
    pub const fn with_travel_model(mut self, travel: TravelModel) -> Self {
        self.travel = travel;
        self
    }

    /// Replace the zone gazetteer.
    #[must_use]
    pub fn with_zones(mut self, zones: ZoneGazetteer) -> Self {
        self.zones = zones;
        self
    }

    /// Replace the hour window averaged into the scalar crowd level.
    #[must_use]
    pub const fn with_visiting_window(mut self, first_hour: u32, last_hour: u32) -> Self {
        self.visiting_window = (first_hour, last_hour);
        self
    }

    /// Replace the suitability lost by an outdoor place at 100% rain.
    #[must_use]
    pub const fn with_rain_penalty(mut self, penalty: f64) -> Self {
        self.rain_penalty = penalty;
        self
    }

    /// Zone gazetteer in use.
    #[must_use]
    pub const fn zones(&self) -> &ZoneGazetteer {
        &self.zones
    }

    /// Travel model in use.
    #[must_use]
    pub const fn travel_model(&self) -> &TravelModel {
        &self.travel
    }
}

impl<M: CrowdModel> ConstraintBuilder<M> {
    /// Crowd model in use.
    #[must_use]
    pub const fn crowd_model(&self) -> &M {
        &self.crowd_model
    }

    /// Assemble the matrices for `places` on `date`.
    ///
    /// Places without coordinates get infinite distances; callers are
    /// expected to filter them out beforehand with
    /// [`crate::partition_routable`].
    #[must_use]
    pub fn build(
        &self,
        places: &[Place],
        date: NaiveDate,
        conditions: &Conditions,
    ) -> ConstraintMatrix {
        let n = places.len();
        debug!("Building constraints for {n} places on {date}");
        let zones: Vec<ZoneId> = places
            .iter()
            .map(|place| {
                place.location.map_or_else(
                    || crate::UNKNOWN_ZONE.to_owned(),
                    |at| self.zones.identify(at),
                )
            })
            .collect();

        let distance = SquareMatrix::from_fn(n, |i, j| {
            if i == j {
                return 0.0;
            }
            match (
                places.get(i).and_then(|p| p.location),
                places.get(j).and_then(|p| p.location),
            ) {
                (Some(a), Some(b)) => distance_km(a, b),
                _ => f64::INFINITY,
            }
        });

        let travel_minutes = SquareMatrix::from_fn(n, |i, j| {
            let km = distance.at(i, j);
            if i == j || !km.is_finite() {
                return km;
            }
            let curated = match (zones.get(i), zones.get(j)) {
                (Some(a), Some(b)) => self.zones.transit_minutes(a, b),
                _ => None,
            };
            curated.unwrap_or_else(|| self.travel.minutes_for(km))
        });

        let suitability = places
            .iter()
            .map(|place| self.suitability(place, conditions))
            .collect();

        let mut missing = conditions.missing.clone();
        let hourly_crowd: Vec<Option<HourlyCrowd>> = places
            .iter()
            .map(|place| self.crowd_model.hourly(place, date, &conditions.events))
            .collect();
        if hourly_crowd.iter().any(Option::is_none) {
            warn!("Crowd model had no estimate for some places; assuming neutral crowding");
            missing.push(DataSource::Crowd);
        }
        let (first, last) = self.visiting_window;
        let crowd = hourly_crowd
            .iter()
            .map(|curve| {
                curve
                    .and_then(|levels| levels.average(first, last))
                    .unwrap_or(NEUTRAL_CROWD)
            })
            .collect();

        ConstraintMatrix {
            distance_km: distance,
            travel_minutes,
            suitability,
            crowd,
            hourly_crowd,
            zones,
            missing,
        }
    }

    fn suitability(&self, place: &Place, conditions: &Conditions) -> f64 {
        match conditions.weather {
            Some(forecast) if !place.indoor => {
                (FULL_SUITABILITY - self.rain_penalty * forecast.rain()).clamp(0.0, 1.0)
            }
            _ => FULL_SUITABILITY,
        }
    }
}
