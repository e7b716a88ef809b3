//! Tour construction and the iteration loop.
//!
//! Each iteration draws one seed per ant from the caller's generator, so a
//! seeded run gives the same tours whether or not construction is
//! parallel. Tours are built independently, then the iteration's elite
//! deposit pheromone on a single thread.

use std::time::Instant;

use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tabi_core::{RouteScorer, RouteSource, SquareMatrix, TerminationReason};

use crate::AntColonyConfig;
use crate::pheromone::PheromoneMatrix;
use crate::termination::ConvergenceTracker;

/// One constructed tour and its score.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    /// Place indices in visiting order.
    pub route: Vec<usize>,
    /// Route score under the run's scorer.
    pub score: f64,
}

/// Outcome of [`Colony::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColonyRun {
    /// Best complete tour found, or the seed route when none beat it.
    pub best: Tour,
    /// Whether `best` came from the colony or from the seed route.
    pub source: RouteSource,
    /// Iterations completed.
    pub iterations: usize,
    /// Why the loop stopped.
    pub termination: TerminationReason,
    /// Best-so-far score after each iteration.
    pub history: Vec<f64>,
    /// Complete tours constructed over the run.
    pub complete_tours: usize,
}

/// A colony bound to one run's scorer.
#[derive(Debug)]
pub struct Colony<'s, 'a> {
    scorer: &'s RouteScorer<'a>,
    config: &'s AntColonyConfig,
    visibility: SquareMatrix,
    reachable: Vec<Vec<bool>>,
    start: Option<usize>,
    deadline: Option<Instant>,
}

impl<'s, 'a> Colony<'s, 'a> {
    /// Colony over `scorer`'s places.
    ///
    /// Edge visibility `(1 / (cost + epsilon))^beta` and the mask of
    /// finite-cost edges are computed once here; edges with unknown cost are
    /// never taken.
    #[must_use]
    pub fn new(scorer: &'s RouteScorer<'a>, config: &'s AntColonyConfig) -> Self {
        let n = scorer.size();
        let costs = SquareMatrix::from_fn(n, |i, j| scorer.edge_cost(i, j));
        let reachable = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| costs.get(i, j).is_some_and(f64::is_finite))
                    .collect()
            })
            .collect();
        let visibility = SquareMatrix::from_fn(n, |i, j| {
            let cost = costs.at(i, j);
            if i == j || !cost.is_finite() {
                0.0
            } else {
                (1.0 / (cost.max(0.0) + config.epsilon)).powf(config.beta)
            }
        });
        Self {
            scorer,
            config,
            visibility,
            reachable,
            start: None,
            deadline: None,
        }
    }

    /// Start every tour at `start`.
    #[must_use]
    pub const fn with_start(mut self, start: Option<usize>) -> Self {
        self.start = start;
        self
    }

    /// Stop before any iteration that would begin after `deadline`.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Search from `seed_route`, typically the nearest-neighbour baseline.
    ///
    /// Only tours at least as long as `seed_route` may replace it, so the
    /// result never covers fewer places than the seed.
    pub fn run<R: Rng + ?Sized>(&self, seed_route: Vec<usize>, rng: &mut R) -> ColonyRun {
        let required = seed_route.len();
        let seed_score = self.scorer.score(&seed_route);
        let mut best = Tour {
            route: seed_route,
            score: seed_score,
        };
        let mut source = RouteSource::Baseline;
        let mut trails = PheromoneMatrix::new(self.scorer.size(), self.config.initial_trail);
        let mut tracker = ConvergenceTracker::new(self.config.termination);
        let mut history = Vec::new();
        let mut complete_tours = 0;
        let mut termination = TerminationReason::BudgetExhausted;

        for iteration in 0..tracker.max_iterations() {
            if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                warn!("Colony deadline reached after {iteration} iterations; keeping best so far");
                termination = TerminationReason::Deadline;
                break;
            }
            let seeds: Vec<u64> = (0..self.config.ants).map(|_| rng.r#gen()).collect();
            let mut tours = self.construct_all(&trails, &seeds);
            for tour in tours.iter().filter(|tour| tour.route.len() >= required) {
                complete_tours += 1;
                if tour.score > best.score {
                    best = tour.clone();
                    source = RouteSource::Colony;
                }
            }
            history.push(best.score);

            tours.sort_by(|a, b| b.score.total_cmp(&a.score));
            trails.evaporate(self.config.evaporation);
            for tour in tours.iter().take(self.config.elite_count()) {
                trails.deposit(&tour.route, self.deposit_for(tour.score));
            }

            let scores: Vec<f64> = tours.iter().map(|tour| tour.score).collect();
            debug!(
                "Colony iteration {iteration}: best {:.3}, iteration best {:.3}",
                best.score,
                scores.first().copied().unwrap_or(f64::NEG_INFINITY)
            );
            if tracker.observe(&scores) {
                debug!("Colony converged after {} iterations", iteration + 1);
                termination = TerminationReason::Converged;
                break;
            }
        }

        ColonyRun {
            best,
            source,
            iterations: history.len(),
            termination,
            history,
            complete_tours,
        }
    }

    fn deposit_for(&self, score: f64) -> f64 {
        if score > 0.0 {
            score * self.config.deposit_per_point
        } else {
            self.config.min_deposit
        }
    }

    #[cfg(feature = "parallel")]
    fn construct_all(&self, trails: &PheromoneMatrix, seeds: &[u64]) -> Vec<Tour> {
        if self.config.parallel {
            seeds
                .par_iter()
                .map(|&seed| self.construct(trails, seed))
                .collect()
        } else {
            self.construct_serial(trails, seeds)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn construct_all(&self, trails: &PheromoneMatrix, seeds: &[u64]) -> Vec<Tour> {
        self.construct_serial(trails, seeds)
    }

    fn construct_serial(&self, trails: &PheromoneMatrix, seeds: &[u64]) -> Vec<Tour> {
        seeds
            .iter()
            .map(|&seed| self.construct(trails, seed))
            .collect()
    }

    /// Build one tour with its own generator seeded from `seed`.
    fn construct(&self, trails: &PheromoneMatrix, seed: u64) -> Tour {
        let n = self.scorer.size();
        if n == 0 {
            return Tour {
                route: Vec::new(),
                score: f64::NEG_INFINITY,
            };
        }
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let origin = self
            .start
            .filter(|start| *start < n)
            .unwrap_or_else(|| rng.gen_range(0..n));
        let mut visited = vec![false; n];
        let mut route = Vec::with_capacity(n);
        let mut current = origin;
        if let Some(seen) = visited.get_mut(origin) {
            *seen = true;
        }
        route.push(origin);
        while let Some(next) = self.choose_next(trails, current, &visited, &mut rng) {
            if let Some(seen) = visited.get_mut(next) {
                *seen = true;
            }
            route.push(next);
            current = next;
        }
        let score = self.scorer.score(&route);
        Tour { route, score }
    }

    /// Whether the edge `i -> j` has a finite cost.
    fn is_reachable(&self, i: usize, j: usize) -> bool {
        self.reachable
            .get(i)
            .and_then(|row| row.get(j))
            .copied()
            .unwrap_or(false)
    }

    /// Roulette-wheel choice among unvisited places reachable from
    /// `current`, falling back to a uniform choice when every weight
    /// underflows to zero.
    fn choose_next(
        &self,
        trails: &PheromoneMatrix,
        current: usize,
        visited: &[bool],
        rng: &mut ChaCha8Rng,
    ) -> Option<usize> {
        let candidates: Vec<(usize, f64)> = visited
            .iter()
            .enumerate()
            .filter(|(j, seen)| !**seen && self.is_reachable(current, *j))
            .map(|(j, _)| {
                let weight = trails.trail(current, j).powf(self.config.alpha)
                    * self.visibility.get(current, j).unwrap_or(0.0);
                (j, if weight.is_finite() { weight } else { 0.0 })
            })
            .collect();
        let total: f64 = candidates.iter().map(|(_, weight)| weight).sum();
        if !(total.is_finite() && total > 0.0) {
            return pick_uniform(&candidates, rng);
        }
        let mut target = rng.gen_range(0.0..total);
        for &(j, weight) in &candidates {
            if target < weight {
                return Some(j);
            }
            target -= weight;
        }
        candidates
            .iter()
            .rev()
            .find(|(_, weight)| *weight > 0.0)
            .map(|(j, _)| *j)
    }
}

fn pick_uniform(candidates: &[(usize, f64)], rng: &mut ChaCha8Rng) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    candidates
        .get(rng.gen_range(0..candidates.len()))
        .map(|(j, _)| *j)
}
