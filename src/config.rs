//! Configuration parameters for the GRASP solver.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::moves::MoveKind;

/// How a neighborhood scan chooses which improving move to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    /// Apply the first move with positive gain.
    FirstImprovement,
    /// Scan the whole neighborhood and apply the best gain.
    BestImprovement,
    /// Apply the first feasible move regardless of its gain.
    Random,
}

/// Source of the greediness parameter α used by each construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlphaPolicy {
    Constant(f64),
    Uniform { lower: f64, upper: f64 },
    /// Draw from a discrete set with probabilities adapted to the revenue
    /// each value produced.
    Reactive { values: Vec<f64> },
}

impl AlphaPolicy {
    /// Reactive policy over 0.1, 0.2, ..., 0.9.
    pub fn reactive_default() -> Self {
        AlphaPolicy::Reactive {
            values: (1..=9).map(|step| step as f64 / 10.0).collect(),
        }
    }
}

/// Score boosts of the constructive heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstructionSettings {
    /// Lower bound of the per-attention boost factor
    pub boost_lower: f64,
    /// Upper bound of the per-attention boost factor
    pub boost_upper: f64,
    /// A LAST commercial only scores once the remaining inventory time is at
    /// most its duration times this coefficient
    pub last_coefficient: f64,
}

impl Default for ConstructionSettings {
    fn default() -> Self {
        ConstructionSettings {
            boost_lower: 0.8,
            boost_upper: 1.2,
            last_coefficient: 1.5,
        }
    }
}

impl ConstructionSettings {
    /// Boost range `[1/deviation, deviation]`.
    pub fn from_deviation(deviation: f64) -> Self {
        ConstructionSettings {
            boost_lower: 1.0 / deviation,
            boost_upper: deviation,
            ..ConstructionSettings::default()
        }
    }
}

/// Variable neighborhood descent settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalSearchSettings {
    /// Neighborhoods in descent order
    pub moves: Vec<MoveKind>,
    /// Probability that a descent step skips its neighborhood
    pub neighborhood_skip_probability: f64,
    /// Probability factor for picking a random feasible move in path relinking
    pub random_move_probability: f64,
    /// Choose neighborhoods by learned probabilities instead of fixed order
    pub adaptive: bool,
    /// Floor of each neighborhood's probability in adaptive mode
    pub min_probability: f64,
    /// Local search calls between probability updates in adaptive mode
    pub update_probabilities_every: usize,
}

impl Default for LocalSearchSettings {
    fn default() -> Self {
        LocalSearchSettings {
            moves: vec![
                MoveKind::Insert,
                MoveKind::OutOfPoolSwap,
                MoveKind::IntraSwap,
                MoveKind::InterSwap,
                MoveKind::Transfer,
                MoveKind::Shift,
            ],
            neighborhood_skip_probability: 0.0,
            random_move_probability: 0.1,
            adaptive: false,
            min_probability: 0.05,
            update_probabilities_every: 50,
        }
    }
}

/// Configuration settings for the GRASP solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Wall-clock budget; the iteration in flight always completes
    pub time_limit: Duration,
    /// Neighborhood scan strategy
    pub search_mode: SearchMode,
    /// Greediness parameter policy
    pub alpha: AlphaPolicy,
    pub construction: ConstructionSettings,
    pub local_search: LocalSearchSettings,
    /// Scales the random-move probability of path relinking
    pub path_relinking_coefficient: f64,
    /// Maximum number of elite solutions
    pub elite_pool_size: usize,
    /// Number of worker threads
    pub thread_count: usize,
    /// Base seed; worker `i` uses `seed + i`
    pub seed: u64,
    /// Collect move statistics and component efficacy
    pub track_statistics: bool,
    /// Verify the full solution after every applied move
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            time_limit: Duration::from_secs(60),
            search_mode: SearchMode::FirstImprovement,
            alpha: AlphaPolicy::reactive_default(),
            construction: ConstructionSettings::default(),
            local_search: LocalSearchSettings::default(),
            path_relinking_coefficient: 1.0,
            elite_pool_size: 10,
            thread_count: 1,
            seed: 0,
            track_statistics: true,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = duration;
        self
    }

    /// Set the neighborhood scan strategy.
    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    /// Set the alpha policy.
    pub fn with_alpha(mut self, alpha: AlphaPolicy) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the construction boosts.
    pub fn with_construction(mut self, construction: ConstructionSettings) -> Self {
        self.construction = construction;
        self
    }

    /// Set the neighborhoods used by local search, in descent order.
    pub fn with_moves(mut self, moves: Vec<MoveKind>) -> Self {
        self.local_search.moves = moves;
        self
    }

    /// Set all local search settings at once.
    pub fn with_local_search(mut self, settings: LocalSearchSettings) -> Self {
        self.local_search = settings;
        self
    }

    /// Set the path relinking random-move coefficient.
    pub fn with_path_relinking_coefficient(mut self, coefficient: f64) -> Self {
        self.path_relinking_coefficient = coefficient;
        self
    }

    /// Set the elite pool capacity.
    pub fn with_elite_pool_size(mut self, size: usize) -> Self {
        self.elite_pool_size = size;
        self
    }

    /// Set the number of worker threads.
    pub fn with_thread_count(mut self, threads: usize) -> Self {
        self.thread_count = threads.max(1);
        self
    }

    /// Set the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable statistics collection.
    pub fn with_statistics(mut self, track: bool) -> Self {
        self.track_statistics = track;
        self
    }

    /// Enable or disable verification after every move.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
