//! Tests for the `AntColonyOptimizer`.

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::{fixture, rstest};
use tabi_core::test_support::{request, tokyo_day, triangle, weekday};
use tabi_core::{
    FixedWeather, NoEvents, OptimizeError, Place, RouteSource, TerminationReason, WeatherForecast,
    lat_lng,
};

use super::*;
use crate::test_support::{clustered_places, quick_config};

type TestOptimizer = AntColonyOptimizer<FixedWeather, NoEvents>;

fn optimizer_with(config: AntColonyConfig) -> TestOptimizer {
    AntColonyOptimizer::with_config(
        FixedWeather(WeatherForecast::default()),
        NoEvents,
        ConstraintBuilder::default(),
        config,
    )
    .expect("valid config")
}

#[fixture]
fn optimizer() -> TestOptimizer {
    optimizer_with(quick_config(7))
}

#[rstest]
fn single_place_passes_through(optimizer: TestOptimizer) {
    let places = vec![Place::new("solo", lat_lng(35.0, 139.0))];
    let result = optimizer
        .optimize(&request(places, weekday()))
        .expect("valid request");
    assert_eq!(result.route.place_ids(), ["solo"]);
    assert!(result.score.abs() < f64::EPSILON);
    assert_eq!(result.diagnostics.source, RouteSource::Passthrough);
    assert_eq!(result.diagnostics.termination, TerminationReason::Skipped);
}

#[rstest]
fn two_places_use_the_baseline(optimizer: TestOptimizer) {
    let places = triangle().into_iter().take(2).collect();
    let result = optimizer
        .optimize(&request(places, weekday()))
        .expect("valid request");
    assert_eq!(result.route.len(), 2);
    assert_eq!(result.diagnostics.source, RouteSource::Baseline);
    assert_eq!(result.diagnostics.iterations, 0);
}

#[rstest]
fn seeded_runs_are_reproducible(optimizer: TestOptimizer) {
    let req = request(clustered_places(10, 3), weekday());
    let first = optimizer.optimize(&req).expect("valid request");
    let second = optimizer.optimize(&req).expect("valid request");
    assert_eq!(first.route.place_ids(), second.route.place_ids());
    assert!((first.score - second.score).abs() < f64::EPSILON);
}

#[test]
fn parallel_and_serial_construction_agree() {
    let req = request(clustered_places(9, 11), weekday());
    let parallel = optimizer_with(quick_config(5));
    let serial = optimizer_with(AntColonyConfig {
        parallel: false,
        ..quick_config(5)
    });
    let a = parallel.optimize(&req).expect("valid request");
    let b = serial.optimize(&req).expect("valid request");
    assert_eq!(a.route.place_ids(), b.route.place_ids());
}

#[rstest]
fn never_scores_below_the_baseline(optimizer: TestOptimizer) {
    let req = request(tokyo_day(), weekday());
    let run = PreparedRun::prepare(
        &req,
        &FixedWeather(WeatherForecast::default()),
        &NoEvents,
        optimizer.builder(),
    )
    .expect("valid request");
    let baseline_score = run.scorer().score(&run.baseline());
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let result = optimizer
        .optimize_with_rng(&req, &mut rng)
        .expect("valid request");
    assert_eq!(result.route.len(), tokyo_day().len());
    assert!(result.score >= baseline_score);
    assert_eq!(result.diagnostics.iterations, 25);
    assert_eq!(
        result.diagnostics.termination,
        TerminationReason::BudgetExhausted
    );
}

#[rstest]
fn start_place_is_honoured(optimizer: TestOptimizer) {
    let mut req = request(tokyo_day(), weekday());
    req.context.start_place_id = Some("tokyo_tower".to_owned());
    let result = optimizer.optimize(&req).expect("valid request");
    assert_eq!(result.route.place_ids().first(), Some(&"tokyo_tower"));
}

#[rstest]
fn unroutable_places_are_left_out(optimizer: TestOptimizer) {
    let mut places = tokyo_day();
    places.push(Place::without_location("ghost"));
    let result = optimizer
        .optimize(&request(places, weekday()))
        .expect("valid request");
    assert_eq!(result.route.len(), tokyo_day().len());
    assert!(result.route.stop("ghost").is_none());
    assert_eq!(
        result.diagnostics.unroutable_place_ids,
        vec!["ghost".to_owned()]
    );
}

#[rstest]
fn invalid_weights_are_rejected(optimizer: TestOptimizer) {
    let mut req = request(tokyo_day(), weekday());
    req.context.weights.crowding = f64::NAN;
    assert!(matches!(
        optimizer.optimize(&req),
        Err(OptimizeError::InvalidRequest(_))
    ));
}

#[test]
fn spent_time_budget_returns_the_baseline() {
    let optimizer = optimizer_with(AntColonyConfig {
        time_budget: Some(Duration::ZERO),
        ..quick_config(1)
    });
    let result = optimizer
        .optimize(&request(tokyo_day(), weekday()))
        .expect("valid request");
    assert_eq!(result.diagnostics.termination, TerminationReason::Deadline);
    assert_eq!(result.diagnostics.source, RouteSource::Baseline);
    assert_eq!(result.diagnostics.iterations, 0);
    assert_eq!(result.route.len(), tokyo_day().len());
}

#[test]
fn invalid_config_is_rejected() {
    let err = AntColonyOptimizer::with_config(
        FixedWeather(WeatherForecast::default()),
        NoEvents,
        ConstraintBuilder::default(),
        AntColonyConfig {
            ants: 0,
            ..AntColonyConfig::default()
        },
    )
    .expect_err("no ants");
    assert_eq!(err, ConfigError::NoAnts);
}
