//! Optimizer trait and its request and result types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ClockTime, DataSource, DetailedRoute, ObjectiveWeights, Place, PlaceId, RouteStats, Warning,
    WeightsError,
};

/// Day-level settings of a request.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use tabi_core::{ClockTime, OptimizationContext};
///
/// let date = NaiveDate::from_ymd_opt(2025, 4, 2).expect("valid date");
/// let context = OptimizationContext::new("tokyo", date).with_start_place("ueno_park");
/// assert_eq!(context.start_time, ClockTime::DAY_START);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationContext {
    /// City key used for weather and events, for example `tokyo`.
    pub city: String,
    /// Travel date.
    pub date: NaiveDate,
    /// Time the day starts; defaults to 09:00.
    #[serde(default)]
    pub start_time: ClockTime,
    /// Place the route must start from, if any.
    #[serde(default)]
    pub start_place_id: Option<PlaceId>,
    /// Objective weights; omitted fields keep their defaults.
    #[serde(default)]
    pub weights: ObjectiveWeights,
}

impl OptimizationContext {
    /// Context starting at 09:00 with default weights.
    #[must_use]
    pub fn new(city: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            city: city.into(),
            date,
            start_time: ClockTime::DAY_START,
            start_place_id: None,
            weights: ObjectiveWeights::default(),
        }
    }

    /// Set the start time.
    #[must_use]
    pub fn with_start_time(mut self, start_time: ClockTime) -> Self {
        self.start_time = start_time;
        self
    }

    /// Fix the first stop.
    #[must_use]
    pub fn with_start_place(mut self, id: impl Into<PlaceId>) -> Self {
        self.start_place_id = Some(id.into());
        self
    }

    /// Override the objective weights.
    #[must_use]
    pub fn with_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.weights = weights;
        self
    }
}

/// Places to order plus the day's context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    /// Candidate places, in the caller's order.
    pub places: Vec<Place>,
    /// Day-level settings.
    pub context: OptimizationContext,
}

impl OptimizationRequest {
    /// Construct a request.
    #[must_use]
    pub const fn new(places: Vec<Place>, context: OptimizationContext) -> Self {
        Self { places, context }
    }
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The iteration budget ran out.
    BudgetExhausted,
    /// Scores stopped varying.
    Converged,
    /// The wall-clock budget ran out.
    Deadline,
    /// No search was needed.
    Skipped,
}

/// Stage that produced the returned route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    /// The metaheuristic search.
    Colony,
    /// The nearest-neighbour baseline.
    Baseline,
    /// Input returned as-is because fewer than two places were routable.
    Passthrough,
}

/// Run metadata returned with every result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Wall-clock time spent, in milliseconds.
    pub optimization_time_ms: u64,
    /// Search iterations completed.
    pub iterations: usize,
    /// Why the search stopped.
    pub termination: TerminationReason,
    /// Stage that produced the route.
    pub source: RouteSource,
    /// Places left out of the route.
    pub unroutable_place_ids: Vec<PlaceId>,
    /// External data replaced by neutral defaults.
    pub missing_data: Vec<DataSource>,
}

/// Final ordering, timing and advice for a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Timed stops in visiting order.
    pub route: DetailedRoute,
    /// Composite score; only comparable within one run.
    pub score: f64,
    /// Short statements about what the ordering achieves.
    pub improvements: Vec<String>,
    /// Issues the traveller should know about.
    pub warnings: Vec<Warning>,
    /// Distance and travel time of the route.
    pub stats: RouteStats,
    /// Run metadata.
    pub diagnostics: Diagnostics,
}

/// Errors returned by [`Optimizer::optimize`].
///
/// Data problems never surface here; they degrade to a usable route.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    /// The objective weights cannot be used.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] WeightsError),
}

/// Orders a day's places.
///
/// Implementations always return some ordering for a well-formed request and
/// must be `Send + Sync` so callers can share them across threads.
pub trait Optimizer: Send + Sync {
    /// Optimize `request`.
    ///
    /// # Errors
    /// Returns [`OptimizeError::InvalidRequest`] for unusable weights.
    fn optimize(&self, request: &OptimizationRequest) -> Result<OptimizationResult, OptimizeError>;
}
