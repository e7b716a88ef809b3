//! Criterion benchmarks for the ant colony optimizer.
//!
//! Measures optimization time for 10, 25 and 50 places with a fixed seed
//! and iteration budget, so regressions in tour construction or scoring
//! show up as slower runs.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package tabi-solver-aco
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tabi_core::test_support::{request, weekday};
use tabi_core::{ConstraintBuilder, FixedWeather, NoEvents, Optimizer, WeatherForecast};
use tabi_solver_aco::test_support::clustered_places;
use tabi_solver_aco::{AntColonyConfig, AntColonyOptimizer, TerminationPolicy};

/// Seed shared by place generation and the colony.
const BENCHMARK_SEED: u64 = 42;

/// Problem sizes to benchmark.
const PROBLEM_SIZES: &[usize] = &[10, 25, 50];

fn bench_config() -> AntColonyConfig {
    AntColonyConfig {
        termination: TerminationPolicy::FixedIterationBudget { iterations: 50 },
        seed: Some(BENCHMARK_SEED),
        ..AntColonyConfig::default()
    }
}

fn bench_optimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize_time");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let Ok(optimizer) = AntColonyOptimizer::with_config(
        FixedWeather(WeatherForecast::default()),
        NoEvents,
        ConstraintBuilder::default(),
        bench_config(),
    ) else {
        return;
    };

    for &size in PROBLEM_SIZES {
        let req = request(clustered_places(size, BENCHMARK_SEED), weekday());
        group.throughput(Throughput::Elements(u64::try_from(size).unwrap_or(u64::MAX)));
        group.bench_with_input(BenchmarkId::new("places", size), &req, |b, req| {
            b.iter(|| black_box(optimizer.optimize(req)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_optimize);
criterion_main!(benches);
