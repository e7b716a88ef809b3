//! Ant colony optimizer for Tabi itineraries.
//!
//! This crate provides [`AntColonyOptimizer`], the default implementation of
//! the [`Optimizer`](tabi_core::Optimizer) trait. A swarm of simulated ants
//! builds candidate orderings guided by pheromone trails and the inverse
//! edge cost, the best tours reinforce their edges, and the search stops
//! when the [`TerminationPolicy`] or the wall-clock budget says so.
//!
//! The search is seeded with the nearest-neighbour baseline, so it never
//! returns an ordering scored below it. Given an explicitly seeded
//! generator, runs are reproducible whether tours are built serially or on
//! the rayon pool.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod colony;
mod config;
mod pheromone;
mod solver;
mod termination;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(all(docsrs, not(test)), doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use colony::{Colony, ColonyRun, Tour};
pub use config::{AntColonyConfig, ConfigError, TerminationPolicy};
pub use pheromone::PheromoneMatrix;
pub use solver::AntColonyOptimizer;
