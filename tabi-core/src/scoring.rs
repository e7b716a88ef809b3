//! Objective weights, edge costs and route scores.
//!
//! Edge costs guide agent construction and are lower-is-better; route
//! scores rank complete candidates and are higher-is-better. Both are only
//! meaningful against the [`ConstraintMatrix`] they were computed from.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timing::schedule;
use crate::{ClockTime, ConstraintMatrix, Place};

/// Relative importance of each objective.
///
/// Distance, time, weather and crowding shape edge costs; experience and
/// fatigue only enter route-level scoring. Missing fields deserialise to
/// their defaults so callers can override a single weight.
///
/// # Examples
/// ```
/// use tabi_core::ObjectiveWeights;
///
/// let weights: ObjectiveWeights = serde_json::from_str(r#"{"crowding": 0.4}"#)?;
/// assert_eq!(weights.crowding, 0.4);
/// assert_eq!(weights.distance, ObjectiveWeights::default().distance);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveWeights {
    /// Weight of kilometres travelled.
    pub distance: f64,
    /// Weight of minutes travelled and of opening-hour violations.
    pub time: f64,
    /// Weight of weather suitability.
    pub weather: f64,
    /// Weight of crowd levels.
    pub crowding: f64,
    /// Weight of place ratings.
    pub experience: f64,
    /// Weight of long days.
    pub fatigue: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            distance: 0.20,
            time: 0.25,
            weather: 0.15,
            crowding: 0.15,
            experience: 0.15,
            fatigue: 0.10,
        }
    }
}

/// Invalid objective weights.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightsError {
    /// A weight was negative or not finite.
    #[error("weight '{name}' must be finite and non-negative, found {value}")]
    Invalid {
        /// Field name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
}

impl ObjectiveWeights {
    /// Check that every weight is finite and non-negative.
    ///
    /// # Errors
    /// Returns [`WeightsError::Invalid`] naming the first bad weight.
    pub fn validate(&self) -> Result<(), WeightsError> {
        [
            ("distance", self.distance),
            ("time", self.time),
            ("weather", self.weather),
            ("crowding", self.crowding),
            ("experience", self.experience),
            ("fatigue", self.fatigue),
        ]
        .into_iter()
        .find(|(_, value)| !(value.is_finite() && *value >= 0.0))
        .map_or(Ok(()), |(name, value)| {
            Err(WeightsError::Invalid { name, value })
        })
    }
}

/// Constants of the scoring formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    /// Score of an empty-cost route before any terms apply.
    pub base_score: f64,
    /// Multiplier applied to every weighted edge-cost term.
    pub edge_scale: f64,
    /// Multiplier of the mean-suitability bonus.
    pub weather_scale: f64,
    /// Multiplier of the mean-crowd penalty.
    pub crowd_scale: f64,
    /// Multiplier of the rating bonus.
    pub experience_scale: f64,
    /// Rating that earns no bonus.
    pub neutral_rating: f64,
    /// Penalty per stop reached while closed, before weighting.
    pub closed_penalty: f64,
    /// Day length in minutes that causes no fatigue.
    pub comfortable_day_minutes: f64,
    /// Penalty per hour beyond the comfortable day, before weighting.
    pub fatigue_per_hour: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            base_score: 100.0,
            edge_scale: 10.0,
            weather_scale: 20.0,
            crowd_scale: 20.0,
            experience_scale: 10.0,
            neutral_rating: 3.0,
            closed_penalty: 20.0,
            comfortable_day_minutes: 480.0,
            fatigue_per_hour: 10.0,
        }
    }
}

/// Scores edges and routes for one run.
#[derive(Debug, Clone)]
pub struct RouteScorer<'a> {
    places: &'a [Place],
    constraints: &'a ConstraintMatrix,
    weights: ObjectiveWeights,
    params: ScoringParams,
    start_time: ClockTime,
    max_distance: f64,
    max_minutes: f64,
}

impl<'a> RouteScorer<'a> {
    /// Scorer with default [`ScoringParams`].
    #[must_use]
    pub fn new(
        places: &'a [Place],
        constraints: &'a ConstraintMatrix,
        weights: ObjectiveWeights,
        start_time: ClockTime,
    ) -> Self {
        Self {
            places,
            constraints,
            weights,
            params: ScoringParams::default(),
            start_time,
            max_distance: constraints.distance_km.max_off_diagonal(),
            max_minutes: constraints.travel_minutes.max_off_diagonal(),
        }
    }

    /// Replace the scoring constants.
    #[must_use]
    pub const fn with_params(mut self, params: ScoringParams) -> Self {
        self.params = params;
        self
    }

    /// Places being scored.
    #[must_use]
    pub const fn places(&self) -> &'a [Place] {
        self.places
    }

    /// Constraint matrix in use.
    #[must_use]
    pub const fn constraints(&self) -> &'a ConstraintMatrix {
        self.constraints
    }

    /// Number of places.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.places.len()
    }

    /// Cost of moving from `i` to `j`; infinite when the edge is unknown.
    ///
    /// Distance and time are normalised by the largest finite value in the
    /// run, so the four terms share a scale.
    #[must_use]
    pub fn edge_cost(&self, i: usize, j: usize) -> f64 {
        let km = self.constraints.distance(i, j);
        let minutes = self.constraints.minutes(i, j);
        if !(km.is_finite() && minutes.is_finite()) {
            return f64::INFINITY;
        }
        let w = &self.weights;
        let distance_term = normalise(km, self.max_distance) * w.distance;
        let time_term = normalise(minutes, self.max_minutes) * w.time;
        let weather_term = (1.0 - self.constraints.suitability_of(j)) * w.weather;
        let crowd_term = self.constraints.crowd_of(j) * w.crowding;
        (distance_term + time_term + weather_term + crowd_term) * self.params.edge_scale
    }

    /// Score of `route`, higher is better; `-inf` for an empty route.
    #[must_use]
    pub fn score(&self, route: &[usize]) -> f64 {
        if route.is_empty() {
            return f64::NEG_INFINITY;
        }
        let w = &self.weights;
        let p = &self.params;
        let mean_suitability = mean_over(route, |i| self.constraints.suitability_of(i));
        let mean_crowd = mean_over(route, |i| self.constraints.crowd_of(i));
        let mean_rating = mean_over(route, |i| {
            self.places
                .get(i)
                .map_or(crate::place::DEFAULT_RATING, Place::effective_rating)
        });

        let mut score = p.base_score;
        score -= self.constraints.route_distance(route) * w.distance;
        score += mean_suitability * w.weather * p.weather_scale;
        score -= mean_crowd * w.crowding * p.crowd_scale;
        score += (mean_rating - p.neutral_rating) * w.experience * p.experience_scale;
        score -= self.day_penalties(route);
        score
    }

    fn day_penalties(&self, route: &[usize]) -> f64 {
        let legs = schedule(route, self.places, self.constraints, self.start_time);
        let closed = legs
            .iter()
            .filter(|leg| {
                self.places
                    .get(leg.index)
                    .and_then(|place| place.hours)
                    .is_some_and(|hours| !hours.contains(leg.arrival))
            })
            .count();
        let day_minutes = legs.last().map_or(0.0, |leg| {
            f64::from(leg.departure.minutes().saturating_sub(self.start_time.minutes()))
        });
        let excess_hours = (day_minutes - self.params.comfortable_day_minutes).max(0.0) / 60.0;
        closed as f64 * self.params.closed_penalty * self.weights.time
            + excess_hours * self.params.fatigue_per_hour * self.weights.fatigue
    }
}

fn mean_over(route: &[usize], value: impl Fn(usize) -> f64) -> f64 {
    route.iter().map(|&i| value(i)).sum::<f64>() / route.len() as f64
}

fn normalise(value: f64, max: f64) -> f64 {
    if max > 0.0 { value / max } else { 0.0 }
}
