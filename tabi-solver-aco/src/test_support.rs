//! Test-only utilities for `tabi-solver-aco`.
//!
//! The helpers in this module are available to unit tests, behavioural
//! tests and benchmarks. They are gated behind the `test-support` feature
//! (and `cfg(test)`).

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tabi_core::{Category, Place, lat_lng};

use crate::{AntColonyConfig, TerminationPolicy};

/// Categories cycled through by [`clustered_places`].
const CATEGORIES: [Category; 6] = [
    Category::Temple,
    Category::Museum,
    Category::Park,
    Category::Food,
    Category::Shopping,
    Category::Landmark,
];

/// Cluster centres in central Tokyo as `(lat, lng)`.
const CLUSTER_CENTRES: [(f64, f64); 4] = [
    (35.7148, 139.7967),
    (35.6595, 139.7004),
    (35.6812, 139.7671),
    (35.6938, 139.7034),
];

/// Spread of places around a cluster centre, in degrees (about 1 km).
const CLUSTER_SPREAD: f64 = 0.01;

/// Deterministic places scattered around a few Tokyo districts.
///
/// # Examples
/// ```
/// use tabi_solver_aco::test_support::clustered_places;
///
/// let places = clustered_places(12, 42);
/// assert_eq!(places.len(), 12);
/// assert_eq!(places, clustered_places(12, 42));
/// ```
#[must_use]
pub fn clustered_places(count: usize, seed: u64) -> Vec<Place> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let (lat, lng) = CLUSTER_CENTRES
                .get(i.rem_euclid(CLUSTER_CENTRES.len()))
                .copied()
                .unwrap_or((35.68, 139.76));
            let category = CATEGORIES
                .get(i.rem_euclid(CATEGORIES.len()))
                .copied()
                .unwrap_or(Category::Other);
            let place = Place::new(
                format!("place_{i}"),
                lat_lng(
                    lat + rng.gen_range(-CLUSTER_SPREAD..CLUSTER_SPREAD),
                    lng + rng.gen_range(-CLUSTER_SPREAD..CLUSTER_SPREAD),
                ),
            )
            .with_name(format!("Place {i}"))
            .with_category(category)
            .with_rating(rng.gen_range(3.5..5.0));
            if category == Category::Museum {
                place.indoor()
            } else {
                place
            }
        })
        .collect()
}

/// A small seeded configuration that keeps tests fast.
#[must_use]
pub fn quick_config(seed: u64) -> AntColonyConfig {
    AntColonyConfig {
        ants: 12,
        termination: TerminationPolicy::FixedIterationBudget { iterations: 25 },
        seed: Some(seed),
        ..AntColonyConfig::default()
    }
}
