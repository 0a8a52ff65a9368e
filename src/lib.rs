//! # Commercial GRASP
//!
//! Schedules commercials into broadcast inventories to maximize revenue,
//! using a Greedy Randomized Adaptive Search Procedure with path relinking.
//!
//! Each iteration builds a solution with a randomized greedy heuristic,
//! improves it by variable neighborhood descent, relinks it with a member of
//! an elite pool of diverse good solutions and improves the result again.
//! Iterations run until a wall-clock budget is spent, on one thread or on
//! several threads sharing the best solution and the elite pool.

pub mod alpha;
pub mod config;
pub mod construction;
pub mod driver;
pub mod elite;
pub mod error;
pub mod generator;
pub mod local_search;
pub mod moves;
pub mod path_relinking;
pub mod problem;
pub mod solution;
pub mod statistics;
pub mod utils;

use crate::alpha::AlphaGenerator;
use crate::config::Config;
use crate::construction::ConstructiveHeuristic;
use crate::driver::{Shared, SolverSolution, Worker};
use crate::error::SearchError;
use crate::problem::Problem;
use crate::solution::Solution;

use log::{error, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::thread;
use std::time::Instant;

/// The main algorithm structure that orchestrates GRASP with path relinking.
pub struct GraspAlgorithm {
    pub problem: Problem,
    pub config: Config,
}

impl GraspAlgorithm {
    /// Create a new solver for the given problem and configuration.
    pub fn new(problem: Problem, config: Config) -> Self {
        GraspAlgorithm { problem, config }
    }

    /// One construction seeded with the base seed. It is the starting best
    /// solution of every run and the baseline any run must match.
    pub fn initial_solution(&self) -> Solution {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let alpha = AlphaGenerator::from_policy(&self.config.alpha).generate(&mut rng);
        ConstructiveHeuristic::new(&self.problem, self.config.construction)
            .construct(alpha.value, &mut rng)
    }

    /// Run until the time limit. The iteration in flight when the limit
    /// passes always completes.
    pub fn run(&self) -> Result<SolverSolution, SearchError> {
        let started = Instant::now();
        let threads = self.config.thread_count.max(1);
        info!(
            "Solving {} ({} commercials, {} inventories) with {} thread(s) for {:?}",
            self.problem.name,
            self.problem.num_commercials(),
            self.problem.num_inventories(),
            threads,
            self.config.time_limit
        );

        let initial = self.initial_solution();
        if self.config.debug {
            initial.verify(&self.problem)?;
        }
        info!("Initial revenue {:.3}", initial.revenue);

        let shared = Shared::new(initial, self.config.elite_pool_size, started);
        if threads == 1 {
            Worker::new(0, &self.problem, &self.config).run(&shared)?;
        } else {
            self.run_parallel(&shared, threads)?;
        }

        let elapsed = started.elapsed().as_secs_f64();
        let state = shared.into_state();
        let iterations_per_second = if elapsed > 0.0 {
            state.iterations as f64 / elapsed
        } else {
            0.0
        };
        info!(
            "Best revenue {:.3} after {} iterations ({:.1} it/s)",
            state.best.revenue, state.iterations, iterations_per_second
        );

        let track = self.config.track_statistics;
        Ok(SolverSolution {
            instance: self.problem.name.clone(),
            revenue: state.best.revenue,
            best: state.best,
            checkpoints: state.checkpoints,
            iterations: state.iterations,
            iterations_per_second,
            elapsed_seconds: elapsed,
            seed: self.config.seed,
            thread_count: threads,
            move_statistics: track.then_some(state.statistics),
            component_efficacy: track.then_some(state.efficacy),
        })
    }

    /// Run `threads` workers in a scope. A panicking worker is logged and
    /// the others keep going; the first search error is returned.
    fn run_parallel(&self, shared: &Shared, threads: usize) -> Result<(), SearchError> {
        let mut first_error = None;
        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(threads);
            for index in 0..threads {
                let problem = &self.problem;
                let config = &self.config;
                handles.push(scope.spawn(move || Worker::new(index, problem, config).run(shared)));
            }

            for (index, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        error!("Worker {} stopped: {}", index, err);
                        first_error.get_or_insert(err);
                    }
                    Err(_) => error!("Worker {} panicked", index),
                }
            }
        });
        first_error.map_or(Ok(()), Err)
    }
}
