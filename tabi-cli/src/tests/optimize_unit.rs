//! Focused unit tests covering optimize CLI configuration and request loading.

use std::time::Duration;

use super::helpers::{tokyo_request, workspace, write_request, write_utf8};
use super::*;
use crate::optimize::{
    DefaultOptimizerBuilder, OptimizeConfig, OptimizerBuilder, config_from_layers_for_test,
    load_optimize_request, run_optimize_with,
};
use camino::Utf8PathBuf;
use rstest::rstest;
use tabi_core::{DataSource, WarningKind};
use tabi_solver_aco::{AntColonyConfig, ConfigError, TerminationPolicy};

fn args_for(request_path: Utf8PathBuf) -> OptimizeArgs {
    OptimizeArgs {
        request_path: Some(request_path),
        ..OptimizeArgs::default()
    }
}

fn quick_args(request_path: Utf8PathBuf) -> OptimizeArgs {
    OptimizeArgs {
        ants: Some(8),
        iterations: Some(10),
        seed: Some(4),
        ..args_for(request_path)
    }
}

#[rstest]
fn converting_without_request_errors() {
    let err = OptimizeConfig::try_from(OptimizeArgs::default())
        .expect_err("missing request should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_OPTIMIZE_REQUEST);
            assert_eq!(env, ENV_OPTIMIZE_REQUEST);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn unset_flags_keep_the_colony_defaults() {
    let config = OptimizeConfig::try_from(args_for(Utf8PathBuf::from("request.json")))
        .expect("config should build");
    assert_eq!(config.colony, AntColonyConfig::default());
    assert_eq!(config.rain_probability, None);
}

#[rstest]
fn flags_override_the_colony_settings() {
    let args = OptimizeArgs {
        rain_probability: Some(0.4),
        time_budget_ms: Some(250),
        ..quick_args(Utf8PathBuf::from("request.json"))
    };
    let config = OptimizeConfig::try_from(args).expect("config should build");
    assert_eq!(config.request_path, Utf8PathBuf::from("request.json"));
    assert_eq!(config.rain_probability, Some(0.4));
    assert_eq!(config.colony.ants, 8);
    assert_eq!(
        config.colony.termination,
        TerminationPolicy::FixedIterationBudget { iterations: 10 }
    );
    assert_eq!(config.colony.time_budget, Some(Duration::from_millis(250)));
    assert_eq!(config.colony.seed, Some(4));
}

#[rstest]
#[case::above_one(1.5)]
#[case::negative(-0.1)]
#[case::not_a_number(f64::NAN)]
fn rain_probability_must_be_a_probability(#[case] rain: f64) {
    let args = OptimizeArgs {
        rain_probability: Some(rain),
        ..args_for(Utf8PathBuf::from("request.json"))
    };
    let err = OptimizeConfig::try_from(args).expect_err("rain should be rejected");
    match err {
        CliError::OutOfRange { field, .. } => assert_eq!(field, ARG_RAIN_PROBABILITY),
        other => panic!("expected OutOfRange, found {other:?}"),
    }
}

#[rstest]
fn zero_ants_are_rejected() {
    let args = OptimizeArgs {
        ants: Some(0),
        ..args_for(Utf8PathBuf::from("request.json"))
    };
    let err = OptimizeConfig::try_from(args).expect_err("no ants");
    match err {
        CliError::ColonyConfig(source) => assert_eq!(source, ConfigError::NoAnts),
        other => panic!("expected ColonyConfig, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_missing_request() {
    let (_tmp, root) = workspace();
    let config = OptimizeConfig::try_from(args_for(root.join("absent.json")))
        .expect("config should build");
    match config.validate_sources().expect_err("expected failure") {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_OPTIMIZE_REQUEST);
            assert_eq!(path, root.join("absent.json"));
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_rejects_directories() {
    let (_tmp, root) = workspace();
    let request_path = root.join("request.json");
    std::fs::create_dir(&request_path).expect("request directory");
    let config = OptimizeConfig::try_from(args_for(request_path)).expect("config should build");
    match config.validate_sources().expect_err("expected failure") {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_OPTIMIZE_REQUEST),
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn load_request_reads_places_and_context() {
    let (_tmp, root) = workspace();
    let path = root.join("request.json");
    write_request(&path, &tokyo_request());
    let request = load_optimize_request(&path).expect("request should load");
    assert_eq!(request, tokyo_request());
}

#[rstest]
fn load_request_accepts_minimal_json() {
    let (_tmp, root) = workspace();
    let path = root.join("request.json");
    write_utf8(
        &path,
        br#"{
            "places": [
                {"id": "a", "location": {"lat": 35.68, "lng": 139.76}},
                {"id": "b"}
            ],
            "context": {"city": "tokyo", "date": "2025-06-04"}
        }"#,
    );
    let request = load_optimize_request(&path).expect("request should load");
    assert_eq!(request.places.len(), 2);
    assert!(request.places.iter().any(|place| place.location.is_none()));
    assert_eq!(request.context.city, "tokyo");
}

#[rstest]
fn load_request_reports_invalid_json() {
    let (_tmp, root) = workspace();
    let path = root.join("request.json");
    write_utf8(&path, b"{ not valid json");
    match load_optimize_request(&path).expect_err("invalid JSON") {
        CliError::ParseRequest { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected ParseRequest, found {other:?}"),
    }
}

#[rstest]
fn load_request_reports_open_failures() {
    let (_tmp, root) = workspace();
    let path = root.join("absent.json");
    match load_optimize_request(&path).expect_err("missing file") {
        CliError::OpenRequest { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected OpenRequest, found {other:?}"),
    }
}

#[rstest]
fn default_builder_reports_missing_weather_without_a_forecast() {
    let (_tmp, root) = workspace();
    let path = root.join("request.json");
    write_request(&path, &tokyo_request());
    let config = OptimizeConfig::try_from(quick_args(path)).expect("config should build");
    let optimizer = DefaultOptimizerBuilder
        .build(&config)
        .expect("optimizer should build");
    let result = optimizer
        .optimize(&tokyo_request())
        .expect("valid request");
    assert!(
        result
            .diagnostics
            .missing_data
            .contains(&DataSource::Weather)
    );
    assert!(
        result
            .warnings
            .iter()
            .all(|warning| warning.kind != WarningKind::Weather)
    );
}

#[rstest]
fn output_is_pretty_json_with_inefficiencies() {
    let (_tmp, root) = workspace();
    let path = root.join("request.json");
    write_request(&path, &tokyo_request());
    let mut buffer = Vec::new();
    run_optimize_with(quick_args(path), &DefaultOptimizerBuilder, &mut buffer)
        .expect("optimize should succeed");
    let stdout = String::from_utf8(buffer).expect("stdout utf-8");
    assert!(stdout.ends_with('\n'));
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("JSON output");
    assert!(value.get("result").is_some());
    assert!(
        value
            .get("inefficiencies")
            .is_some_and(serde_json::Value::is_array)
    );
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "request_path": 42 }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let (_tmp, root) = workspace();
    let env_request = root.join("from-env-request.json");
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "ants": 5,
            "iterations": 40,
            "rain_probability": 0.2,
        }),
        None,
    );
    composer.push_environment(json!({
        "request_path": env_request.as_str(),
        "ants": 7,
    }));
    composer.push_cli(json!({
        "ants": 9,
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.request_path, env_request);
    assert_eq!(config.colony.ants, 9);
    assert_eq!(
        config.colony.termination,
        TerminationPolicy::FixedIterationBudget { iterations: 40 }
    );
    assert_eq!(config.rain_probability, Some(0.2));
}
