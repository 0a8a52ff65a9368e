//! GRASP iteration loop and the state workers share.
//!
//! Each worker owns its RNG, alpha generator, local search and statistics.
//! Only the best solution, elite pool, checkpoints and iteration counter are
//! shared, behind one mutex that is never held while searching.

use log::{debug, info};
use parking_lot::{Mutex, MutexGuard};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::alpha::AlphaGenerator;
use crate::config::Config;
use crate::construction::ConstructiveHeuristic;
use crate::elite::ElitePool;
use crate::error::SearchError;
use crate::local_search::LocalSearch;
use crate::moves::RunContext;
use crate::path_relinking::PathRelinking;
use crate::problem::Problem;
use crate::solution::Solution;
use crate::statistics::{Component, ComponentEfficacy, MoveStatistics};

/// Revenue of the best solution at the moment it was found.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CheckPoint {
    pub revenue: f64,
    pub elapsed_seconds: f64,
}

/// Result of a solver run.
#[derive(Debug, Clone, Serialize)]
pub struct SolverSolution {
    pub instance: String,
    #[serde(skip)]
    pub best: Solution,
    pub revenue: f64,
    /// Strictly increasing in both time and revenue.
    pub checkpoints: Vec<CheckPoint>,
    pub iterations: u64,
    pub iterations_per_second: f64,
    pub elapsed_seconds: f64,
    pub seed: u64,
    pub thread_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_statistics: Option<MoveStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_efficacy: Option<ComponentEfficacy>,
}

/// Everything guarded by the shared lock.
#[derive(Debug)]
pub struct SharedState {
    pub best: Solution,
    pub elite: ElitePool,
    pub checkpoints: Vec<CheckPoint>,
    pub iterations: u64,
    pub statistics: MoveStatistics,
    pub efficacy: ComponentEfficacy,
}

/// Lock-protected state plus the run's start time.
#[derive(Debug)]
pub struct Shared {
    state: Mutex<SharedState>,
    started: Instant,
}

impl Shared {
    /// Start a run with `initial` as the best known solution.
    pub fn new(initial: Solution, elite_pool_size: usize, started: Instant) -> Self {
        let checkpoint = CheckPoint {
            revenue: initial.revenue,
            elapsed_seconds: started.elapsed().as_secs_f64(),
        };
        Shared {
            state: Mutex::new(SharedState {
                best: initial,
                elite: ElitePool::new(elite_pool_size),
                checkpoints: vec![checkpoint],
                iterations: 0,
                statistics: MoveStatistics::new(),
                efficacy: ComponentEfficacy::new(),
            }),
            started,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock()
    }

    pub fn into_state(self) -> SharedState {
        self.state.into_inner()
    }

    /// A random elite member to relink toward, once the pool has more than
    /// two members.
    fn guiding_solution(&self, rng: &mut ChaCha8Rng) -> Option<Solution> {
        let state = self.lock();
        if state.elite.len() > 2 {
            state.elite.random(rng).cloned()
        } else {
            None
        }
    }

    /// Record a local optimum: update the best solution and checkpoints,
    /// offer it to the elite pool and count the iteration.
    ///
    /// The timestamp is taken under the lock so checkpoints stay ordered
    /// across workers.
    pub fn publish(&self, solution: &Solution) {
        let mut state = self.lock();
        let elapsed = self.elapsed().as_secs_f64();
        if solution.revenue > state.best.revenue {
            info!(
                "New best revenue {:.3} after {:.2}s",
                solution.revenue, elapsed
            );
            state.best = solution.clone();
            state.checkpoints.push(CheckPoint {
                revenue: solution.revenue,
                elapsed_seconds: elapsed,
            });
        }
        state.elite.try_add(solution);
        state.iterations += 1;
    }

    fn merge(&self, statistics: &MoveStatistics, efficacy: &ComponentEfficacy) {
        let mut state = self.lock();
        state.statistics.merge(statistics);
        state.efficacy.merge(efficacy);
    }
}

/// One search thread.
pub struct Worker<'a> {
    index: usize,
    problem: &'a Problem,
    config: &'a Config,
    rng: ChaCha8Rng,
    alpha: AlphaGenerator,
    construction: ConstructiveHeuristic<'a>,
    local_search: LocalSearch,
    relinking: PathRelinking,
    efficacy: ComponentEfficacy,
}

impl<'a> Worker<'a> {
    /// Worker `index` draws from the stream seeded with `seed + index`.
    pub fn new(index: usize, problem: &'a Problem, config: &'a Config) -> Self {
        let run = RunContext::new(config.debug);
        Worker {
            index,
            problem,
            config,
            rng: ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(index as u64)),
            alpha: AlphaGenerator::from_policy(&config.alpha),
            construction: ConstructiveHeuristic::new(problem, config.construction),
            local_search: LocalSearch::new(config.local_search.clone(), config.search_mode, run)
                .with_statistics(config.track_statistics),
            relinking: PathRelinking::new(
                config.path_relinking_coefficient,
                config.local_search.random_move_probability,
                run,
            ),
            efficacy: ComponentEfficacy::new(),
        }
    }

    /// Iterate until the time limit, then merge statistics into `shared`.
    pub fn run(mut self, shared: &Shared) -> Result<(), SearchError> {
        let mut result = Ok(());
        while shared.elapsed() < self.config.time_limit {
            if let Err(err) = self.iterate(shared) {
                result = Err(err);
                break;
            }
        }
        shared.merge(&self.local_search.take_statistics(), &self.efficacy);
        result
    }

    /// Construct, improve, optionally relink and improve again, then publish.
    pub fn iterate(&mut self, shared: &Shared) -> Result<Solution, SearchError> {
        let draw = self.alpha.generate(&mut self.rng);

        let started = Instant::now();
        let constructed = self.construction.construct(draw.value, &mut self.rng);
        self.efficacy.record(
            Component::ConstructiveHeuristic,
            started.elapsed(),
            constructed.revenue,
        );
        if self.config.debug {
            constructed.verify(self.problem)?;
        }

        let mut solution = self.improve(&constructed)?;
        let searched = solution.revenue;

        if let Some(guide) = shared.guiding_solution(&mut self.rng) {
            let started = Instant::now();
            let relinked = self
                .relinking
                .relink(self.problem, &solution, &guide, &mut self.rng)?;
            self.efficacy.record(
                Component::PathRelinking,
                started.elapsed(),
                relinked.revenue - solution.revenue,
            );
            solution = self.improve(&relinked)?;
        }

        debug!(
            "worker {}: alpha {:.2}, constructed {:.3}, searched {:.3}, final {:.3}",
            self.index, draw.value, constructed.revenue, searched, solution.revenue
        );

        self.alpha.feedback(draw, solution.revenue);
        shared.publish(&solution);
        Ok(solution)
    }

    fn improve(&mut self, start: &Solution) -> Result<Solution, SearchError> {
        let started = Instant::now();
        let improved = self.local_search.search(self.problem, start, &mut self.rng)?;
        self.efficacy.record(
            Component::LocalSearch,
            started.elapsed(),
            improved.revenue - start.revenue,
        );
        Ok(improved)
    }
}
