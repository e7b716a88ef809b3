//! Pheromone trails for one colony run.

use tabi_core::SquareMatrix;

/// Trail strength for every ordered pair of places.
///
/// Trails are owned by a single run and discarded with it. Deposits are
/// symmetric, so `trail(i, j) == trail(j, i)` holds throughout a run.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneMatrix {
    trails: SquareMatrix,
}

impl PheromoneMatrix {
    /// Uniform trails of strength `initial` over `size` places.
    #[must_use]
    pub fn new(size: usize, initial: f64) -> Self {
        Self {
            trails: SquareMatrix::filled(size, initial),
        }
    }

    /// Number of places.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.trails.size()
    }

    /// Trail strength on edge `i -> j`; zero when out of range.
    #[must_use]
    pub fn trail(&self, i: usize, j: usize) -> f64 {
        self.trails.get(i, j).unwrap_or(0.0)
    }

    /// Decay every trail by `rate`, a fraction in `[0, 1)`.
    pub fn evaporate(&mut self, rate: f64) {
        self.trails.scale_all(1.0 - rate);
    }

    /// Add `amount` to both directions of every edge along `route`.
    pub fn deposit(&mut self, route: &[usize], amount: f64) {
        for leg in route.windows(2) {
            if let [from, to] = *leg {
                self.trails.add(from, to, amount);
                self.trails.add(to, from, amount);
            }
        }
    }
}
