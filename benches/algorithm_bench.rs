//! Benchmarks for the commercial scheduling GRASP.

#[cfg(feature = "bench")]
extern crate criterion;

use commercial_grasp::config::{Config, ConstructionSettings, LocalSearchSettings, SearchMode};
use commercial_grasp::construction::ConstructiveHeuristic;
use commercial_grasp::generator::{generate, GeneratorConfig};
use commercial_grasp::local_search::LocalSearch;
use commercial_grasp::moves::RunContext;
use commercial_grasp::path_relinking::PathRelinking;
use commercial_grasp::problem::Problem;
use commercial_grasp::GraspAlgorithm;
#[cfg(feature = "bench")]
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// Create a benchmark problem with `size` commercials and one inventory per
/// eight commercials.
fn create_benchmark_problem(size: usize) -> Problem {
    let config = GeneratorConfig::new()
        .with_size(size, (size / 8).max(1))
        .with_seed(size as u64);
    generate(&config).expect("generated instance is valid")
}

#[cfg(feature = "bench")]
fn benchmark_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for size in [50, 100, 200].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let problem = create_benchmark_problem(size);
            let heuristic = ConstructiveHeuristic::new(&problem, ConstructionSettings::default());
            let mut rng = ChaCha8Rng::seed_from_u64(0);

            b.iter(|| heuristic.construct(0.3, &mut rng));
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_local_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("local_search");

    for size in [50, 100, 200].iter() {
        for mode in [SearchMode::FirstImprovement, SearchMode::BestImprovement] {
            let id = BenchmarkId::new(format!("{:?}", mode), size);
            group.bench_with_input(id, size, |b, &size| {
                let problem = create_benchmark_problem(size);
                let mut rng = ChaCha8Rng::seed_from_u64(0);
                let start = ConstructiveHeuristic::new(&problem, ConstructionSettings::default())
                    .construct(0.5, &mut rng);
                let mut local_search =
                    LocalSearch::new(LocalSearchSettings::default(), mode, RunContext::default());

                b.iter(|| local_search.search(&problem, &start, &mut rng));
            });
        }
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_path_relinking(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_relinking");

    for size in [50, 100].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let problem = create_benchmark_problem(size);
            let heuristic = ConstructiveHeuristic::new(&problem, ConstructionSettings::default());
            let mut rng = ChaCha8Rng::seed_from_u64(0);
            let initial = heuristic.construct(0.5, &mut rng);
            let guiding = heuristic.construct(0.5, &mut rng);
            let relinking = PathRelinking::new(1.0, 0.1, RunContext::default());

            b.iter(|| relinking.relink(&problem, &initial, &guiding, &mut rng));
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_convergence(c: &mut Criterion) {
    let mut group = c.benchmark_group("convergence");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(30));

    for threads in [1, 4].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(threads),
            threads,
            |b, &threads| {
                let problem = create_benchmark_problem(100);
                let config = Config::new()
                    .with_time_limit(Duration::from_secs(1))
                    .with_thread_count(threads);

                b.iter(|| GraspAlgorithm::new(problem.clone(), config.clone()).run());
            },
        );
    }

    group.finish();
}

#[cfg(feature = "bench")]
criterion_group!(
    benches,
    benchmark_construction,
    benchmark_local_search,
    benchmark_path_relinking,
    benchmark_convergence
);

#[cfg(feature = "bench")]
criterion_main!(benches);
