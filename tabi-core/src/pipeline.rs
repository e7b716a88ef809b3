//! Shared request handling around a search strategy.
//!
//! Every optimizer follows the same outline: validate the request, drop
//! places that cannot be routed, gather conditions, build constraints,
//! search, then time the winning order and explain it. [`PreparedRun`]
//! owns everything except the search, so strategies only decide the order.

use std::time::{Duration, Instant};

use log::{info, warn};

use crate::clock::round_minutes;
use crate::timing::{CROWDED_ABOVE, QUIET_BELOW};
use crate::{
    Conditions, ConstraintBuilder, ConstraintMatrix, CrowdModel, DetailedRoute, Diagnostics,
    EventProvider, InefficiencyThresholds, OptimizationContext, OptimizationRequest,
    OptimizationResult, OptimizeError, Place, RouteScorer, RouteSource, RouteStats, Severity,
    TerminationReason, UnroutablePlace, Warning, WarningKind, WeatherForecast, WeatherProvider,
    annotate, detect_inefficiencies_with, nearest_neighbor_by, partition_routable,
};
/// Smallest saving worth reporting, in kilometres.
const REPORTABLE_SAVING_KM: f64 = 0.05;

/// Outcome of a search, handed back to [`PreparedRun::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSummary {
    /// Winning order as indices into [`PreparedRun::places`].
    pub route: Vec<usize>,
    /// Iterations completed.
    pub iterations: usize,
    /// Why the search stopped.
    pub termination: TerminationReason,
    /// Stage that produced `route`.
    pub source: RouteSource,
}

impl SearchSummary {
    /// Summary for a route taken straight from the baseline.
    #[must_use]
    pub const fn baseline(route: Vec<usize>) -> Self {
        Self {
            route,
            iterations: 0,
            termination: TerminationReason::Skipped,
            source: RouteSource::Baseline,
        }
    }
}

/// A validated request with its constraints built, ready to be searched.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    started_at: Instant,
    context: OptimizationContext,
    input_len: usize,
    places: Vec<Place>,
    unroutable: Vec<UnroutablePlace>,
    conditions: Conditions,
    constraints: ConstraintMatrix,
    start_index: Option<usize>,
}

impl PreparedRun {
    /// Validate `request` and build its constraints.
    ///
    /// Unroutable places are set aside and reported later. With fewer than
    /// two routable places the providers are not consulted.
    ///
    /// # Errors
    /// Returns [`OptimizeError::InvalidRequest`] when the weights are
    /// negative or not finite.
    pub fn prepare<W, E, M>(
        request: &OptimizationRequest,
        weather: &W,
        events: &E,
        builder: &ConstraintBuilder<M>,
    ) -> Result<Self, OptimizeError>
    where
        W: WeatherProvider + ?Sized,
        E: EventProvider + ?Sized,
        M: CrowdModel,
    {
        let started_at = Instant::now();
        let context = &request.context;
        context.weights.validate()?;
        let (places, unroutable) = partition_routable(&request.places);
        let conditions = if places.len() < 2 {
            Conditions::neutral()
        } else {
            Conditions::gather(weather, events, &context.city, context.date)
        };
        let constraints = builder.build(&places, context.date, &conditions);
        let start_index = context.start_place_id.as_deref().and_then(|id| {
            let found = places.iter().position(|place| place.id == id);
            if found.is_none() {
                warn!("Start place {id} is not routable; choosing a start freely");
            }
            found
        });
        Ok(Self {
            started_at,
            context: context.clone(),
            input_len: request.places.len(),
            places,
            unroutable,
            conditions,
            constraints,
            start_index,
        })
    }

    /// Routable places, in the caller's order.
    #[must_use]
    pub const fn places(&self) -> &[Place] {
        self.places.as_slice()
    }

    /// Number of routable places.
    #[must_use]
    pub const fn routable_count(&self) -> usize {
        self.places.len()
    }

    /// Whether there is nothing to search.
    #[must_use]
    pub const fn is_passthrough(&self) -> bool {
        self.places.len() < 2
    }

    /// Constraints over [`Self::places`].
    #[must_use]
    pub const fn constraints(&self) -> &ConstraintMatrix {
        &self.constraints
    }

    /// Conditions the constraints were built from.
    #[must_use]
    pub const fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    /// Request context.
    #[must_use]
    pub const fn context(&self) -> &OptimizationContext {
        &self.context
    }

    /// Index of the requested start place, when it is routable.
    #[must_use]
    pub const fn start_index(&self) -> Option<usize> {
        self.start_index
    }

    /// Time since [`Self::prepare`] began.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Scorer over this run's places and constraints.
    #[must_use]
    pub fn scorer(&self) -> RouteScorer<'_> {
        RouteScorer::new(
            &self.places,
            &self.constraints,
            self.context.weights,
            self.context.start_time,
        )
    }

    /// Nearest-neighbour order, honouring the start place.
    #[must_use]
    pub fn baseline(&self) -> Vec<usize> {
        nearest_neighbor_by(&self.constraints.distance_km, self.start_index)
    }

    /// Result for a run with fewer than two routable places.
    #[must_use]
    pub fn passthrough(self) -> OptimizationResult {
        let route = (0..self.places.len()).collect();
        self.finish(SearchSummary {
            route,
            iterations: 0,
            termination: TerminationReason::Skipped,
            source: RouteSource::Passthrough,
        })
    }

    /// Time, score and explain the order in `summary`.
    #[must_use]
    pub fn finish(self, summary: SearchSummary) -> OptimizationResult {
        let SearchSummary {
            route,
            iterations,
            termination,
            source,
        } = summary;
        let score = if source == RouteSource::Passthrough {
            0.0
        } else {
            self.scorer().score(&route)
        };
        let detailed = annotate(
            &route,
            &self.places,
            &self.constraints,
            self.context.start_time,
        );
        let stats = RouteStats::measure(&route, &self.constraints);
        let warnings = self.warnings(&route, &detailed);
        let improvements = self.improvements(&route, &detailed, &stats);
        let diagnostics = Diagnostics {
            optimization_time_ms: u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX),
            iterations,
            termination,
            source,
            unroutable_place_ids: self.unroutable.iter().map(|u| u.id.clone()).collect(),
            missing_data: self.constraints.missing.clone(),
        };
        info!(
            "Ordered {} of {} places via {:?} in {} ms ({} iterations, {:?})",
            detailed.len(),
            self.input_len,
            diagnostics.source,
            diagnostics.optimization_time_ms,
            diagnostics.iterations,
            diagnostics.termination,
        );
        OptimizationResult {
            route: detailed,
            score,
            improvements,
            warnings,
            stats,
            diagnostics,
        }
    }

    fn label(&self, index: usize) -> &str {
        self.places.get(index).map_or("", |place| {
            if place.name.is_empty() {
                &place.id
            } else {
                &place.name
            }
        })
    }

    fn outdoor_stops(&self, route: &[usize]) -> usize {
        route
            .iter()
            .filter(|&&i| self.places.get(i).is_some_and(|place| !place.indoor))
            .count()
    }

    fn warnings(&self, route: &[usize], detailed: &DetailedRoute) -> Vec<Warning> {
        let mut warnings = Vec::new();
        if let Some(forecast) = self.conditions.weather.filter(WeatherForecast::is_rainy) {
            let outdoor = self.outdoor_stops(route);
            if outdoor > 0 {
                warnings.push(Warning::new(
                    WarningKind::Weather,
                    Severity::Medium,
                    format!(
                        "Rain likely ({:.0}% chance); {outdoor} outdoor stops on the route",
                        forecast.rain() * 100.0
                    ),
                ));
            }
        }
        for (&index, stop) in route.iter().zip(&detailed.stops) {
            if stop.crowd_level > CROWDED_ABOVE {
                warnings.push(Warning::new(
                    WarningKind::Crowding,
                    Severity::Medium,
                    format!(
                        "{} is expected to be very crowded at {}",
                        self.label(index),
                        stop.arrival_time
                    ),
                ));
            }
            if let Some(hours) = self.places.get(index).and_then(|place| place.hours)
                && !hours.contains(stop.arrival_time)
            {
                warnings.push(Warning::new(
                    WarningKind::OpeningHours,
                    Severity::High,
                    format!(
                        "{} is closed at {} (open {:02}:00-{:02}:00)",
                        self.label(index),
                        stop.arrival_time,
                        hours.open,
                        hours.close
                    ),
                ));
            }
        }
        warnings.extend(self.conditions.events.iter().map(|event| {
            Warning::new(WarningKind::SeasonalEvent, Severity::Low, event.message.clone())
        }));
        warnings.extend(self.constraints.missing.iter().map(|source| {
            Warning::new(
                WarningKind::DataUnavailable,
                Severity::Low,
                format!("{} data unavailable; neutral defaults used", source.as_str()),
            )
        }));
        if !self.unroutable.is_empty() {
            let ids: Vec<&str> = self.unroutable.iter().map(|u| u.id.as_str()).collect();
            warnings.push(Warning::new(
                WarningKind::UnroutablePlaces,
                Severity::Medium,
                format!(
                    "{} places could not be routed: {}",
                    ids.len(),
                    ids.join(", ")
                ),
            ));
        }
        if let Some(id) = self.context.start_place_id.as_deref()
            && self.start_index.is_none()
        {
            warnings.push(Warning::new(
                WarningKind::UnknownStartPlace,
                Severity::Low,
                format!("Start place {id} is not on the route; the start was chosen freely"),
            ));
        }
        warnings
    }

    fn improvements(
        &self,
        route: &[usize],
        detailed: &DetailedRoute,
        stats: &RouteStats,
    ) -> Vec<String> {
        let mut improvements = Vec::new();
        if route.is_empty() {
            return improvements;
        }
        let thresholds = InefficiencyThresholds::default();
        improvements.push(format!(
            "Visits {} stops over {:.1} km",
            route.len(),
            stats.total_distance_km
        ));
        let input_order: Vec<usize> = (0..self.places.len()).collect();
        let saved = self.constraints.route_distance(&input_order) - stats.total_distance_km;
        if saved.is_finite() && saved >= REPORTABLE_SAVING_KM {
            improvements.push(format!("Saves {saved:.1} km compared with the original order"));
            let minutes = round_minutes(saved * thresholds.minutes_per_excess_km);
            if minutes > 0 {
                improvements.push(format!("Saves about {minutes} minutes of travel"));
            }
        }
        let ordered: Vec<Place> = route
            .iter()
            .filter_map(|&i| self.places.get(i).cloned())
            .collect();
        let before = detect_inefficiencies_with(&self.places, &thresholds).len();
        let after = detect_inefficiencies_with(&ordered, &thresholds).len();
        if before > after {
            improvements.push(format!(
                "Fixes {} inefficiencies found in the original order",
                before - after
            ));
        }
        let quiet = detailed
            .stops
            .iter()
            .filter(|stop| stop.crowd_level < QUIET_BELOW)
            .count();
        if quiet > 0 {
            improvements.push(format!("{quiet} stops are scheduled at quiet times"));
        }
        if self.conditions.is_rainy() {
            let outdoor = self.outdoor_stops(route);
            improvements.push(format!(
                "Weather-aware: {} indoor and {outdoor} outdoor stops on a rainy day",
                route.len() - outdoor
            ));
        }
        improvements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, FixedWeather, NoEvents, NoWeatherData, SeasonalCalendar, lat_lng};
    use chrono::NaiveDate;
    use rstest::rstest;

    fn request(places: Vec<Place>) -> OptimizationRequest {
        let date = NaiveDate::from_ymd_opt(2025, 6, 4).expect("valid date");
        OptimizationRequest::new(places, OptimizationContext::new("tokyo", date))
    }

    fn prepare(request: &OptimizationRequest) -> PreparedRun {
        PreparedRun::prepare(
            request,
            &FixedWeather(WeatherForecast::default()),
            &NoEvents,
            &ConstraintBuilder::default(),
        )
        .expect("valid request")
    }

    fn line() -> Vec<Place> {
        vec![
            Place::new("a", lat_lng(35.0, 139.0)),
            Place::new("c", lat_lng(35.0, 139.02)),
            Place::new("b", lat_lng(35.0, 139.01)),
        ]
    }

    #[test]
    fn invalid_weights_are_rejected() {
        let mut req = request(line());
        req.context.weights.distance = -1.0;
        let err = PreparedRun::prepare(
            &req,
            &NoWeatherData,
            &NoEvents,
            &ConstraintBuilder::default(),
        )
        .expect_err("negative weight");
        assert!(matches!(err, OptimizeError::InvalidRequest(_)));
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![Place::new("solo", lat_lng(35.0, 139.0))])]
    fn tiny_inputs_pass_through(#[case] places: Vec<Place>) {
        let count = places.len();
        let run = prepare(&request(places));
        assert!(run.is_passthrough());
        let result = run.passthrough();
        assert_eq!(result.route.len(), count);
        assert!(result.score.abs() < f64::EPSILON);
        assert_eq!(result.diagnostics.source, RouteSource::Passthrough);
        assert!(result.diagnostics.missing_data.is_empty());
    }

    #[test]
    fn unroutable_and_unknown_start_are_reported() {
        let mut places = line();
        places.push(Place::without_location("ghost"));
        let mut req = request(places);
        req.context.start_place_id = Some("nowhere".to_owned());
        let run = prepare(&req);
        assert_eq!(run.routable_count(), 3);
        assert_eq!(run.start_index(), None);
        let baseline = run.baseline();
        let result = run.finish(SearchSummary::baseline(baseline));
        assert_eq!(result.diagnostics.unroutable_place_ids, vec!["ghost".to_owned()]);
        let kinds: Vec<WarningKind> = result.warnings.iter().map(|w| w.kind).collect();
        assert!(kinds.contains(&WarningKind::UnroutablePlaces));
        assert!(kinds.contains(&WarningKind::UnknownStartPlace));
    }

    #[test]
    fn finishing_reports_savings_over_input_order() {
        let run = prepare(&request(line()));
        let result = run.finish(SearchSummary::baseline(vec![0, 2, 1]));
        assert_eq!(result.route.place_ids(), ["a", "b", "c"]);
        assert!(result.score.is_finite());
        // Input a, c, b doubles back by about 0.9 km, which costs about 9 minutes.
        assert!(
            result
                .improvements
                .iter()
                .any(|line| line.starts_with("Saves 0.9 km"))
        );
        assert!(
            result
                .improvements
                .iter()
                .any(|line| line == "Saves about 9 minutes of travel")
        );
        assert!(
            result
                .improvements
                .iter()
                .any(|line| line == "Fixes 1 inefficiencies found in the original order")
        );
    }

    #[test]
    fn keeping_the_input_order_claims_no_savings() {
        let run = prepare(&request(line()));
        let result = run.finish(SearchSummary::baseline(vec![0, 1, 2]));
        assert!(
            result
                .improvements
                .iter()
                .all(|line| !line.starts_with("Saves") && !line.starts_with("Fixes"))
        );
    }

    #[test]
    fn missing_weather_is_a_data_warning() {
        let req = request(line());
        let run = PreparedRun::prepare(
            &req,
            &NoWeatherData,
            &NoEvents,
            &ConstraintBuilder::default(),
        )
        .expect("valid request");
        let result = run.finish(SearchSummary::baseline(vec![0, 2, 1]));
        assert!(result.warnings.iter().any(|w| {
            w.kind == WarningKind::DataUnavailable && w.message.starts_with("weather")
        }));
        assert_eq!(result.route.len(), 3);
    }

    #[test]
    fn rain_and_seasons_raise_warnings() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 2).expect("valid date");
        let places = vec![
            Place::new("ueno_park", lat_lng(35.7148, 139.7734)).with_category(Category::Park),
            Place::new("museum", lat_lng(35.7188, 139.7765))
                .with_category(Category::Museum)
                .indoor(),
        ];
        let req = OptimizationRequest::new(places, OptimizationContext::new("tokyo", date));
        let run = PreparedRun::prepare(
            &req,
            &FixedWeather(WeatherForecast::with_rain(0.8)),
            &SeasonalCalendar::default(),
            &ConstraintBuilder::default(),
        )
        .expect("valid request");
        let result = run.finish(SearchSummary::baseline(vec![0, 1]));
        let kinds: Vec<WarningKind> = result.warnings.iter().map(|w| w.kind).collect();
        assert!(kinds.contains(&WarningKind::Weather));
        assert!(kinds.contains(&WarningKind::SeasonalEvent));
        assert!(
            result
                .improvements
                .iter()
                .any(|line| line.starts_with("Weather-aware: 1 indoor and 1 outdoor"))
        );
    }
}
