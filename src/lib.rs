//! Facade crate for the Tabi itinerary route optimization engine.
//!
//! This crate re-exports the core domain types and exposes the ant colony
//! optimizer behind the `solver-aco` feature flag.

#![forbid(unsafe_code)]

pub use tabi_core::{
    Category, ClockTime, Conditions, ConstraintBuilder, ConstraintMatrix, CrowdModel,
    DataSource, DetailedRoute, Diagnostics, EventProvider, FixedWeather, HeuristicCrowdModel,
    Inefficiency, InefficiencyKind, InefficiencyThresholds, NoEvents, NoWeatherData,
    ObjectiveWeights, OpeningHours, OptimizationContext, OptimizationRequest, OptimizationResult,
    OptimizeError, Optimizer, Place, PlaceError, PlaceId, ProviderError, RouteSource, RouteStats,
    RouteStop, SeasonalCalendar, SeasonalEvent, Severity, TerminationReason, TravelModel,
    Warning, WarningKind, WeatherForecast, WeatherProvider, Zone, ZoneGazetteer, annotate,
    detect_inefficiencies, distance_km, lat_lng, nearest_neighbor,
};

#[cfg(feature = "solver-aco")]
pub use tabi_solver_aco::{AntColonyConfig, AntColonyOptimizer, ConfigError, TerminationPolicy};
