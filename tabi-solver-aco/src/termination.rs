//! Convergence bookkeeping for [`TerminationPolicy`].

use crate::TerminationPolicy;

/// Tracks how long the colony's scores have stayed settled.
#[derive(Debug, Clone)]
pub(crate) struct ConvergenceTracker {
    policy: TerminationPolicy,
    settled: usize,
}

impl ConvergenceTracker {
    pub(crate) const fn new(policy: TerminationPolicy) -> Self {
        Self { policy, settled: 0 }
    }

    pub(crate) const fn max_iterations(&self) -> usize {
        self.policy.max_iterations()
    }

    /// Record one iteration's tour scores. Returns `true` once the policy
    /// considers the search converged.
    pub(crate) fn observe(&mut self, scores: &[f64]) -> bool {
        match self.policy {
            TerminationPolicy::FixedIterationBudget { .. } => false,
            TerminationPolicy::VarianceConvergence {
                threshold,
                patience,
                ..
            } => {
                if variance(scores) < threshold {
                    self.settled += 1;
                } else {
                    self.settled = 0;
                }
                self.settled >= patience
            }
        }
    }
}

/// Population variance of the finite values in `scores`.
#[expect(
    clippy::cast_precision_loss,
    reason = "tour counts are far below 2^52"
)]
pub(crate) fn variance(scores: &[f64]) -> f64 {
    let finite: Vec<f64> = scores.iter().copied().filter(|s| s.is_finite()).collect();
    if finite.len() < 2 {
        return 0.0;
    }
    let count = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / count;
    finite.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / count
}
