//! `AntColonyOptimizer`, the [`Optimizer`] running the full pipeline.

use std::time::Instant;

use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tabi_core::{
    ConstraintBuilder, CrowdModel, EventProvider, HeuristicCrowdModel, OptimizationRequest,
    OptimizationResult, OptimizeError, Optimizer, PreparedRun, SearchSummary, WeatherProvider,
};

use crate::colony::Colony;
use crate::{AntColonyConfig, ConfigError};

/// Ant colony search over a day's places.
///
/// The optimizer is generic over the data boundaries: a weather provider,
/// an event provider and the crowd model inside its [`ConstraintBuilder`].
/// Runs with fewer than two routable places return the input unchanged,
/// and two places are ordered by the nearest-neighbour baseline.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use tabi_core::{
///     FixedWeather, NoEvents, OptimizationContext, OptimizationRequest, Optimizer, Place,
///     WeatherForecast, lat_lng,
/// };
/// use tabi_solver_aco::AntColonyOptimizer;
///
/// let optimizer = AntColonyOptimizer::new(FixedWeather(WeatherForecast::default()), NoEvents)
///     .with_seed(7);
/// let date = NaiveDate::from_ymd_opt(2025, 6, 4).expect("valid date");
/// let places = vec![
///     Place::new("a", lat_lng(35.680, 139.760)),
///     Place::new("b", lat_lng(35.690, 139.770)),
///     Place::new("c", lat_lng(35.700, 139.760)),
/// ];
/// let request = OptimizationRequest::new(places, OptimizationContext::new("tokyo", date));
/// let result = optimizer.optimize(&request).expect("valid request");
/// assert_eq!(result.route.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct AntColonyOptimizer<W, E, M = HeuristicCrowdModel> {
    weather: W,
    events: E,
    builder: ConstraintBuilder<M>,
    config: AntColonyConfig,
}

impl<W, E> AntColonyOptimizer<W, E>
where
    W: WeatherProvider,
    E: EventProvider,
{
    /// Optimizer with the default constraint builder and configuration.
    #[must_use]
    pub fn new(weather: W, events: E) -> Self {
        Self {
            weather,
            events,
            builder: ConstraintBuilder::default(),
            config: AntColonyConfig::default(),
        }
    }
}

impl<W, E, M> AntColonyOptimizer<W, E, M>
where
    W: WeatherProvider,
    E: EventProvider,
    M: CrowdModel,
{
    /// Optimizer with an explicit builder and configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when `config` is out of range.
    pub fn with_config(
        weather: W,
        events: E,
        builder: ConstraintBuilder<M>,
        config: AntColonyConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            weather,
            events,
            builder,
            config,
        })
    }

    /// Fix the generator seed used by [`Optimizer::optimize`].
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Colony configuration.
    #[must_use]
    pub const fn config(&self) -> &AntColonyConfig {
        &self.config
    }

    /// Constraint builder.
    #[must_use]
    pub const fn builder(&self) -> &ConstraintBuilder<M> {
        &self.builder
    }

    /// Optimize `request`, drawing randomness from `rng`.
    ///
    /// Identical inputs and an identically seeded `rng` give identical
    /// routes and scores.
    ///
    /// # Errors
    /// Returns [`OptimizeError::InvalidRequest`] for unusable weights.
    pub fn optimize_with_rng<R: Rng + ?Sized>(
        &self,
        request: &OptimizationRequest,
        rng: &mut R,
    ) -> Result<OptimizationResult, OptimizeError> {
        let run = PreparedRun::prepare(request, &self.weather, &self.events, &self.builder)?;
        if run.is_passthrough() {
            debug!("Fewer than two routable places; returning them unchanged");
            return Ok(run.passthrough());
        }
        let baseline = run.baseline();
        if run.routable_count() == 2 {
            debug!("Two routable places; using the nearest-neighbour order");
            return Ok(run.finish(SearchSummary::baseline(baseline)));
        }

        let deadline = self
            .config
            .time_budget
            .and_then(|budget| Instant::now().checked_add(budget));
        let outcome = {
            let scorer = run.scorer();
            Colony::new(&scorer, &self.config)
                .with_start(run.start_index())
                .with_deadline(deadline)
                .run(baseline, rng)
        };
        if outcome.complete_tours == 0 {
            warn!("Colony produced no complete tour; falling back to the baseline");
        }
        debug!(
            "Colony finished: {} iterations, best score {:.3} from {:?}",
            outcome.iterations, outcome.best.score, outcome.source
        );
        Ok(run.finish(SearchSummary {
            route: outcome.best.route,
            iterations: outcome.iterations,
            termination: outcome.termination,
            source: outcome.source,
        }))
    }
}

impl<W, E, M> Optimizer for AntColonyOptimizer<W, E, M>
where
    W: WeatherProvider,
    E: EventProvider,
    M: CrowdModel,
{
    fn optimize(&self, request: &OptimizationRequest) -> Result<OptimizationResult, OptimizeError> {
        let mut rng = self
            .config
            .seed
            .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
        self.optimize_with_rng(request, &mut rng)
    }
}

#[cfg(test)]
mod tests;
