//! Optimize command implementation for the tabi CLI.

use std::io::{BufReader, Write};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tabi_core::{
    ConstraintBuilder, FixedWeather, Inefficiency, NoWeatherData, OptimizationRequest,
    OptimizationResult, Optimizer, Place, SeasonalCalendar, WeatherForecast,
    detect_inefficiencies,
};
use tabi_solver_aco::{AntColonyConfig, AntColonyOptimizer, TerminationPolicy};

use crate::fs::{file_is_file, open_utf8_file};
use crate::{
    ARG_ANTS, ARG_ITERATIONS, ARG_OPTIMIZE_REQUEST, ARG_RAIN_PROBABILITY, ARG_SEED,
    ARG_TIME_BUDGET_MS, CliError, ENV_OPTIMIZE_REQUEST,
};

/// CLI arguments for the `optimize` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "optimize",
    long_about = "Order the places of a JSON optimization request ({places, \
                 context}) into a day itinerary. The colony settings can \
                 come from CLI flags, configuration files, or TABI_* \
                 environment variables.",
    about = "Optimize the visiting order of a day's places"
)]
#[ortho_config(prefix = "TABI")]
pub(crate) struct OptimizeArgs {
    /// Path to a JSON file containing an optimization request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Fix the forecast rain probability (0 to 1) instead of running without weather data.
    #[arg(long = ARG_RAIN_PROBABILITY, value_name = "probability")]
    #[serde(default)]
    pub(crate) rain_probability: Option<f64>,
    /// Tours constructed per colony iteration.
    #[arg(long = ARG_ANTS, value_name = "count")]
    #[serde(default)]
    pub(crate) ants: Option<usize>,
    /// Run exactly this many iterations instead of stopping on convergence.
    #[arg(long = ARG_ITERATIONS, value_name = "count")]
    #[serde(default)]
    pub(crate) iterations: Option<usize>,
    /// Wall-clock budget for the colony search in milliseconds.
    #[arg(long = ARG_TIME_BUDGET_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) time_budget_ms: Option<u64>,
    /// Seed for reproducible runs.
    #[arg(long = ARG_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl OptimizeArgs {
    pub(crate) fn into_config(self) -> Result<OptimizeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        OptimizeConfig::try_from(merged)
    }
}

/// Resolved `optimize` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OptimizeConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Forecast rain probability; `None` runs without weather data.
    pub(crate) rain_probability: Option<f64>,
    /// Colony settings with the CLI overrides applied.
    pub(crate) colony: AntColonyConfig,
}

impl OptimizeConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        match file_is_file(&self.request_path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field: ARG_OPTIMIZE_REQUEST,
                path: self.request_path.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field: ARG_OPTIMIZE_REQUEST,
                    path: self.request_path.clone(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_OPTIMIZE_REQUEST,
                path: self.request_path.clone(),
                source,
            }),
        }
    }
}

impl TryFrom<OptimizeArgs> for OptimizeConfig {
    type Error = CliError;

    fn try_from(args: OptimizeArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_OPTIMIZE_REQUEST,
            env: ENV_OPTIMIZE_REQUEST,
        })?;

        if let Some(rain) = args.rain_probability
            && !(0.0..=1.0).contains(&rain)
        {
            return Err(CliError::OutOfRange {
                field: ARG_RAIN_PROBABILITY,
                expected: "between 0 and 1",
                value: rain,
            });
        }

        let defaults = AntColonyConfig::default();
        let colony = AntColonyConfig {
            ants: args.ants.unwrap_or(defaults.ants),
            termination: args.iterations.map_or(defaults.termination, |iterations| {
                TerminationPolicy::FixedIterationBudget { iterations }
            }),
            time_budget: args.time_budget_ms.map(Duration::from_millis),
            seed: args.seed,
            ..defaults
        };
        colony.validate()?;

        Ok(Self {
            request_path,
            rain_probability: args.rain_probability,
            colony,
        })
    }
}

/// Builds an optimizer for the current invocation.
pub(super) trait OptimizerBuilder {
    fn build(&self, config: &OptimizeConfig) -> Result<Box<dyn Optimizer>, CliError>;
}

/// Ant colony optimizer with the seasonal calendar and, when a rain
/// probability is given, a fixed forecast.
pub(super) struct DefaultOptimizerBuilder;

impl OptimizerBuilder for DefaultOptimizerBuilder {
    fn build(&self, config: &OptimizeConfig) -> Result<Box<dyn Optimizer>, CliError> {
        let events = SeasonalCalendar::default();
        let builder = ConstraintBuilder::default();
        let colony = config.colony.clone();
        let optimizer: Box<dyn Optimizer> = match config.rain_probability {
            Some(rain) => Box::new(AntColonyOptimizer::with_config(
                FixedWeather(WeatherForecast::with_rain(rain)),
                events,
                builder,
                colony,
            )?),
            None => Box::new(AntColonyOptimizer::with_config(
                NoWeatherData,
                events,
                builder,
                colony,
            )?),
        };
        Ok(optimizer)
    }
}

/// JSON document printed by `tabi optimize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct OptimizeOutput {
    /// Optimizer result.
    pub(crate) result: OptimizationResult,
    /// Detours and long hops left on the optimized route.
    pub(crate) inefficiencies: Vec<Inefficiency>,
}

pub(super) fn run_optimize(args: OptimizeArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_optimize_with(args, &DefaultOptimizerBuilder, &mut stdout)
}

pub(super) fn run_optimize_with(
    args: OptimizeArgs,
    builder: &dyn OptimizerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let output = execute_optimize(args, builder)?;
    write_optimize_output(writer, &output)
}

fn execute_optimize(
    args: OptimizeArgs,
    builder: &dyn OptimizerBuilder,
) -> Result<OptimizeOutput, CliError> {
    let config = resolve_optimize_config(args)?;
    let request = load_optimize_request(&config.request_path)?;
    debug!(
        "loaded {} places for {} on {} from {}",
        request.places.len(),
        request.context.city,
        request.context.date,
        config.request_path
    );
    let optimizer = builder.build(&config)?;
    let result = optimizer
        .optimize(&request)
        .map_err(|source| CliError::Optimize { source })?;
    let inefficiencies = detect_inefficiencies(&routed_places(&request.places, &result));
    Ok(OptimizeOutput {
        result,
        inefficiencies,
    })
}

fn resolve_optimize_config(args: OptimizeArgs) -> Result<OptimizeConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Places in the order the optimized route visits them.
fn routed_places(places: &[Place], result: &OptimizationResult) -> Vec<Place> {
    result
        .route
        .place_ids()
        .into_iter()
        .filter_map(|id| places.iter().find(|place| place.id == id).cloned())
        .collect()
}

/// Loads a JSON-encoded [`OptimizationRequest`] from disk.
pub(super) fn load_optimize_request(path: &Utf8Path) -> Result<OptimizationRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseRequest {
        path: path.to_path_buf(),
        source,
    })
}

fn write_optimize_output(writer: &mut dyn Write, output: &OptimizeOutput) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(output).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<OptimizeConfig, CliError> {
    let merged = OptimizeArgs::merge_from_layers(layers).map_err(CliError::from)?;
    OptimizeConfig::try_from(merged)
}
