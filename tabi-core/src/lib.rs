//! Core domain types for the Tabi itinerary route optimization engine.
//!
//! The crate holds everything an optimizer needs except the search itself:
//! typed [`Place`] records, great-circle geometry, the zone gazetteer, the
//! weather, event and crowd inputs, the [`ConstraintBuilder`], the greedy
//! [`nearest_neighbor`] baseline, route scoring, the inefficiency detector
//! and the timing post-processor. Search strategies implement [`Optimizer`]
//! and reuse [`PreparedRun`] to turn a request into an
//! [`OptimizationResult`].

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod baseline;
pub mod category;
pub mod clock;
pub mod conditions;
pub mod constraints;
pub mod crowd;
pub mod geodesy;
pub mod inefficiency;
pub mod matrix;
pub mod optimizer;
pub mod pipeline;
pub mod place;
pub mod route;
pub mod scoring;
pub mod timing;
pub mod warning;
pub mod zone;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(all(docsrs, not(test)), doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use baseline::{nearest_neighbor, nearest_neighbor_by};
pub use category::Category;
pub use clock::{ClockTime, ClockTimeError};
pub use conditions::{
    Conditions, DataSource, EventProvider, FixedWeather, NoEvents, NoWeatherData, ProviderError,
    SeasonalCalendar, SeasonalEvent, WeatherForecast, WeatherProvider,
};
pub use constraints::{ConstraintBuilder, ConstraintMatrix};
pub use crowd::{CrowdModel, HeuristicCrowdModel, HourlyCrowd};
pub use geodesy::{TravelModel, distance_km, lat_lng, travel_time_minutes};
pub use inefficiency::{
    Inefficiency, InefficiencyKind, InefficiencyThresholds, detect_inefficiencies,
    detect_inefficiencies_with,
};
pub use matrix::SquareMatrix;
pub use optimizer::{
    Diagnostics, OptimizationContext, OptimizationRequest, OptimizationResult, OptimizeError,
    Optimizer, RouteSource, TerminationReason,
};
pub use pipeline::{PreparedRun, SearchSummary};
pub use place::{OpeningHours, Place, PlaceError, PlaceId, UnroutablePlace, partition_routable};
pub use route::{DetailedRoute, RouteStats, RouteStop};
pub use scoring::{ObjectiveWeights, RouteScorer, ScoringParams, WeightsError};
pub use timing::{annotate, visit_duration_minutes};
pub use warning::{Severity, Warning, WarningKind};
pub use zone::{UNKNOWN_ZONE, Zone, ZoneGazetteer, ZoneId};
