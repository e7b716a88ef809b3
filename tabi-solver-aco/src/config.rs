//! Colony tunables.

use std::time::Duration;

use thiserror::Error;

/// When the colony stops iterating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TerminationPolicy {
    /// Run exactly `iterations` iterations.
    FixedIterationBudget {
        /// Iterations to run.
        iterations: usize,
    },
    /// Stop once the spread of tour scores stays below `threshold` for
    /// `patience` consecutive iterations, or after `max_iterations`.
    VarianceConvergence {
        /// Upper bound on iterations.
        max_iterations: usize,
        /// Variance of one iteration's scores regarded as settled.
        threshold: f64,
        /// Consecutive settled iterations required.
        patience: usize,
    },
}

impl TerminationPolicy {
    /// Upper bound on iterations.
    #[must_use]
    pub const fn max_iterations(&self) -> usize {
        match *self {
            Self::FixedIterationBudget { iterations } => iterations,
            Self::VarianceConvergence { max_iterations, .. } => max_iterations,
        }
    }
}

impl Default for TerminationPolicy {
    fn default() -> Self {
        Self::VarianceConvergence {
            max_iterations: 100,
            threshold: 1e-3,
            patience: 5,
        }
    }
}

/// Configuration for [`crate::AntColonyOptimizer`].
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use tabi_solver_aco::{AntColonyConfig, TerminationPolicy};
///
/// let config = AntColonyConfig {
///     ants: 10,
///     termination: TerminationPolicy::FixedIterationBudget { iterations: 20 },
///     time_budget: Some(Duration::from_millis(200)),
///     seed: Some(7),
///     ..AntColonyConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AntColonyConfig {
    /// Tours constructed per iteration.
    pub ants: usize,
    /// Exponent applied to trail strength.
    pub alpha: f64,
    /// Exponent applied to the inverse edge cost.
    pub beta: f64,
    /// Fraction of every trail lost per iteration.
    pub evaporation: f64,
    /// Fraction of an iteration's best tours that deposit pheromone.
    pub elite_fraction: f64,
    /// Trail strength every edge starts with.
    pub initial_trail: f64,
    /// Pheromone deposited per point of tour score.
    pub deposit_per_point: f64,
    /// Deposit of a tour whose score is not positive.
    pub min_deposit: f64,
    /// Added to edge costs before inversion.
    pub epsilon: f64,
    /// When to stop iterating.
    pub termination: TerminationPolicy,
    /// Wall-clock budget for the search, checked before every iteration.
    pub time_budget: Option<Duration>,
    /// Construct tours on the rayon pool when the `parallel` feature is on.
    pub parallel: bool,
    /// Seed for [`crate::AntColonyOptimizer`]'s generator; `None` draws one
    /// from the operating system.
    pub seed: Option<u64>,
}

impl Default for AntColonyConfig {
    fn default() -> Self {
        Self {
            ants: 30,
            alpha: 1.0,
            beta: 2.0,
            evaporation: 0.1,
            elite_fraction: 0.1,
            initial_trail: 1.0,
            deposit_per_point: 0.01,
            min_deposit: 0.01,
            epsilon: 1e-6,
            termination: TerminationPolicy::default(),
            time_budget: None,
            parallel: true,
            seed: None,
        }
    }
}

/// Errors raised by [`AntColonyConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The colony needs at least one ant.
    #[error("the colony needs at least one ant")]
    NoAnts,
    /// A parameter lies outside its valid range.
    #[error("{name} must be {expected}")]
    OutOfRange {
        /// Parameter name.
        name: &'static str,
        /// Description of the valid range.
        expected: &'static str,
    },
}

impl AntColonyConfig {
    /// Check every parameter lies in its valid range.
    ///
    /// # Errors
    /// Returns [`ConfigError`] naming the first offending parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ants == 0 {
            return Err(ConfigError::NoAnts);
        }
        let non_negative = |value: f64| value.is_finite() && value >= 0.0;
        let checks = [
            ("alpha", non_negative(self.alpha), "finite and non-negative"),
            ("beta", non_negative(self.beta), "finite and non-negative"),
            (
                "evaporation",
                (0.0..1.0).contains(&self.evaporation),
                "in [0, 1)",
            ),
            (
                "elite_fraction",
                self.elite_fraction > 0.0 && self.elite_fraction <= 1.0,
                "in (0, 1]",
            ),
            (
                "initial_trail",
                self.initial_trail.is_finite() && self.initial_trail > 0.0,
                "finite and positive",
            ),
            (
                "deposit_per_point",
                non_negative(self.deposit_per_point),
                "finite and non-negative",
            ),
            (
                "min_deposit",
                non_negative(self.min_deposit),
                "finite and non-negative",
            ),
            (
                "epsilon",
                self.epsilon.is_finite() && self.epsilon > 0.0,
                "finite and positive",
            ),
        ];
        match checks.into_iter().find(|(_, ok, _)| !ok) {
            Some((name, _, expected)) => Err(ConfigError::OutOfRange { name, expected }),
            None => self.validate_termination(),
        }
    }

    fn validate_termination(&self) -> Result<(), ConfigError> {
        match self.termination {
            TerminationPolicy::VarianceConvergence {
                threshold,
                patience,
                ..
            } if !(threshold.is_finite() && threshold >= 0.0) || patience == 0 => {
                Err(ConfigError::OutOfRange {
                    name: "termination",
                    expected: "a finite non-negative threshold with non-zero patience",
                })
            }
            _ => Ok(()),
        }
    }

    /// Number of tours allowed to deposit pheromone each iteration.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "the product is a small non-negative count bounded by `ants`"
    )]
    pub fn elite_count(&self) -> usize {
        let count = (self.ants as f64 * self.elite_fraction).ceil() as usize;
        count.clamp(1, self.ants.max(1))
    }
}
