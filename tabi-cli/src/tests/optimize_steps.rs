//! Behaviour-driven step definitions driving the optimize CLI scenarios.

use super::helpers::{tokyo_request, workspace, write_request, write_utf8};
use super::*;
use crate::optimize::{DefaultOptimizerBuilder, OptimizeOutput, run_optimize_with};
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tabi_core::WarningKind;
use tabi_core::test_support::tokyo_day;
use tempfile::TempDir;

#[derive(Debug)]
struct OptimizeWorld {
    _tmp: TempDir,
    request_path: Utf8PathBuf,
    include_request: RefCell<bool>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl OptimizeWorld {
    fn new() -> Self {
        let (tmp, root) = workspace();
        Self {
            _tmp: tmp,
            request_path: root.join("request.json"),
            include_request: RefCell::new(true),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["tabi".to_owned(), "optimize".to_owned()];
        if *self.include_request.borrow() {
            argv.push(self.request_path.as_str().to_owned());
        }
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn push_flag(&self, flag: &str, value: String) {
        let mut args = self.cli_args.borrow_mut();
        args.push(format!("--{flag}"));
        args.push(value);
    }

    fn output(&self) -> OptimizeOutput {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        if let Err(err) = result {
            panic!("expected success, found {err:?}");
        }
        let stdout = String::from_utf8(self.stdout.borrow().clone()).expect("stdout utf-8");
        serde_json::from_str(&stdout).expect("output should be JSON optimize output")
    }

    fn error_matches(&self, check: impl FnOnce(&CliError) -> bool) {
        let borrowed = self.result.borrow();
        let error = borrowed
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect_err("expected error");
        assert!(check(error), "unexpected error {error:?}");
    }
}

#[fixture]
fn world() -> OptimizeWorld {
    OptimizeWorld::new()
}

#[given("a Tokyo day request exists on disk")]
fn tokyo_request_exists(#[from(world)] world: &OptimizeWorld) {
    write_request(&world.request_path, &tokyo_request());
}

#[given("a Tokyo day request with a negative distance weight exists on disk")]
fn invalid_weights_request_exists(#[from(world)] world: &OptimizeWorld) {
    let mut request = tokyo_request();
    request.context.weights.distance = -1.0;
    write_request(&world.request_path, &request);
}

#[given("the optimization request contains invalid JSON")]
fn request_contains_invalid_json(#[from(world)] world: &OptimizeWorld) {
    write_utf8(&world.request_path, b"{ not valid json");
}

#[given("I omit the optimization request path")]
fn omit_request_path(#[from(world)] world: &OptimizeWorld) {
    *world.include_request.borrow_mut() = false;
}

#[given("the colony runs {iterations} iterations with seed {seed}")]
fn colony_budget(#[from(world)] world: &OptimizeWorld, iterations: usize, seed: u64) {
    world.push_flag(ARG_ITERATIONS, iterations.to_string());
    world.push_flag(ARG_ANTS, "8".to_owned());
    world.push_flag(ARG_SEED, seed.to_string());
}

#[given("the rain probability is {rain}")]
fn rain_probability(#[from(world)] world: &OptimizeWorld, rain: f64) {
    world.push_flag(ARG_RAIN_PROBABILITY, rain.to_string());
}

#[when("I run the optimize command")]
fn run_optimize_command(#[from(world)] world: &OptimizeWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Optimize(args) => {
            let mut buffer = world.stdout.borrow_mut();
            run_optimize_with(args, &DefaultOptimizerBuilder, &mut *buffer)
        }
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints JSON output")]
fn command_succeeds_and_prints_json(#[from(world)] world: &OptimizeWorld) {
    let output = world.output();
    assert!(output.result.score.is_finite());
    assert_eq!(output.result.diagnostics.iterations, 10);
}

#[then("every place in the request is routed once")]
fn every_place_routed_once(#[from(world)] world: &OptimizeWorld) {
    let output = world.output();
    let mut routed = output.result.route.place_ids();
    routed.sort_unstable();
    let places = tokyo_day();
    let mut expected: Vec<&str> = places.iter().map(|place| place.id.as_str()).collect();
    expected.sort_unstable();
    assert_eq!(routed, expected);
}

#[then("the output warns about the weather")]
fn output_warns_about_weather(#[from(world)] world: &OptimizeWorld) {
    let output = world.output();
    assert!(
        output
            .result
            .warnings
            .iter()
            .any(|warning| warning.kind == WarningKind::Weather)
    );
}

#[then("the command fails because the request JSON is invalid")]
fn command_fails_invalid_json(#[from(world)] world: &OptimizeWorld) {
    world.error_matches(|error| matches!(error, CliError::ParseRequest { .. }));
}

#[then("the command fails because the request path is missing")]
fn command_fails_missing_request_path(#[from(world)] world: &OptimizeWorld) {
    world.error_matches(|error| {
        matches!(error, CliError::MissingArgument { field, .. } if *field == ARG_OPTIMIZE_REQUEST)
    });
}

#[then("the command fails because the rain probability is out of range")]
fn command_fails_rain_out_of_range(#[from(world)] world: &OptimizeWorld) {
    world.error_matches(|error| {
        matches!(error, CliError::OutOfRange { field, .. } if *field == ARG_RAIN_PROBABILITY)
    });
}

#[then("the command fails because the optimizer rejected the request")]
fn command_fails_optimizer_rejected(#[from(world)] world: &OptimizeWorld) {
    world.error_matches(|error| matches!(error, CliError::Optimize { .. }));
}

macro_rules! register_optimize_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/optimize_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: OptimizeWorld) {
            let _ = world;
        }
    };
}

register_optimize_scenario!(optimize_happy_path, "optimizing a request from JSON");
register_optimize_scenario!(optimize_fixed_rain, "fixing the chance of rain");
register_optimize_scenario!(optimize_invalid_json, "rejecting invalid JSON input");
register_optimize_scenario!(optimize_missing_request, "rejecting missing request paths");
register_optimize_scenario!(
    optimize_rain_out_of_range,
    "rejecting an impossible chance of rain"
);
register_optimize_scenario!(
    optimize_invalid_weights,
    "rejecting invalid objective weights"
);
