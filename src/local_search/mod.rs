//! Local search operators for the GRASP solver.
//!
//! Each neighborhood lives in its own file as an `impl LocalSearch` block.
//! A neighborhood scan applies at most one move and reports the resulting
//! solution; [`LocalSearch::search`] strings scans together by variable
//! neighborhood descent or, in adaptive mode, by learned probabilities.

pub mod chain_swap;
pub mod insert;
pub mod inter_swap;
pub mod intra_swap;
pub mod out_of_pool;
pub mod remove;
pub mod shift;
pub mod transfer;

use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Instant;

use crate::config::{LocalSearchSettings, SearchMode};
use crate::error::SearchError;
use crate::moves::{Move, MoveKind, RunContext};
use crate::problem::Problem;
use crate::solution::Solution;
use crate::statistics::MoveStatistics;

/// Gains at or below this are treated as float noise, not improvement.
pub const IMPROVEMENT_EPSILON: f64 = 1e-6;

/// Manages the local search phase of the GRASP solver.
///
/// Adaptive probabilities and statistics persist across [`search`] calls,
/// so one instance is kept per worker.
///
/// [`search`]: LocalSearch::search
#[derive(Debug, Clone)]
pub struct LocalSearch {
    settings: LocalSearchSettings,
    mode: SearchMode,
    run: RunContext,
    track_statistics: bool,
    statistics: MoveStatistics,
    /// Selection probability per entry of `settings.moves` (adaptive mode)
    probabilities: Vec<f64>,
    /// Revenue gained per entry of `settings.moves` (adaptive mode)
    gains: Vec<f64>,
    calls: usize,
}

impl LocalSearch {
    /// Create a new local search instance.
    pub fn new(settings: LocalSearchSettings, mode: SearchMode, run: RunContext) -> Self {
        let count = settings.moves.len().max(1);
        LocalSearch {
            probabilities: vec![1.0 / count as f64; settings.moves.len()],
            gains: vec![0.0; settings.moves.len()],
            settings,
            mode,
            run,
            track_statistics: false,
            statistics: MoveStatistics::new(),
            calls: 0,
        }
    }

    /// Enable per-move statistics.
    pub fn with_statistics(mut self, track: bool) -> Self {
        self.track_statistics = track;
        self
    }

    pub fn statistics(&self) -> &MoveStatistics {
        &self.statistics
    }

    /// Hand out the collected statistics and start over.
    pub fn take_statistics(&mut self) -> MoveStatistics {
        std::mem::take(&mut self.statistics)
    }

    /// Current adaptive selection probabilities, one per configured move.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Improve `start` until no configured neighborhood yields a better
    /// solution. Returns the best solution seen, never worse than `start`.
    pub fn search<R: Rng>(
        &mut self,
        problem: &Problem,
        start: &Solution,
        rng: &mut R,
    ) -> Result<Solution, SearchError> {
        let result = if self.settings.adaptive {
            self.search_adaptive(problem, start, rng)?
        } else {
            self.search_vnd(problem, start, rng)?
        };

        self.calls += 1;
        if self.settings.adaptive
            && self.settings.update_probabilities_every > 0
            && self.calls % self.settings.update_probabilities_every == 0
        {
            self.update_probabilities();
        }
        Ok(result)
    }

    /// Fixed neighborhood order; restart at the first kind on improvement.
    fn search_vnd<R: Rng>(
        &mut self,
        problem: &Problem,
        start: &Solution,
        rng: &mut R,
    ) -> Result<Solution, SearchError> {
        let mut best = start.clone();
        let mut current = start.clone();
        let mut k = 0;

        while k < self.settings.moves.len() {
            if rng.gen::<f64>() < self.settings.neighborhood_skip_probability {
                k += 1;
                continue;
            }

            let kind = self.settings.moves[k];
            if let Some(next) = self.step(kind, problem, &current, rng)? {
                current = next;
            }

            if current.revenue > best.revenue + IMPROVEMENT_EPSILON {
                best = current.clone();
                k = 0;
            } else {
                k += 1;
            }
        }
        Ok(best)
    }

    /// Probability-driven neighborhood choice; stop after `2 × |moves|`
    /// consecutive steps without improvement.
    fn search_adaptive<R: Rng>(
        &mut self,
        problem: &Problem,
        start: &Solution,
        rng: &mut R,
    ) -> Result<Solution, SearchError> {
        let mut best = start.clone();
        let mut current = start.clone();
        let patience = self.settings.moves.len() * 2;
        let mut idle = 0;

        while idle < patience {
            if rng.gen::<f64>() < self.settings.neighborhood_skip_probability {
                idle += 1;
                continue;
            }

            let index = self.select_move(rng);
            let kind = self.settings.moves[index];
            let before = current.revenue;
            if let Some(next) = self.step(kind, problem, &current, rng)? {
                current = next;
            }
            self.gains[index] += current.revenue - before;

            if current.revenue > best.revenue + IMPROVEMENT_EPSILON {
                best = current.clone();
                idle = 0;
            } else {
                idle += 1;
            }
        }
        Ok(best)
    }

    fn select_move<R: Rng>(&self, rng: &mut R) -> usize {
        let draw: f64 = rng.gen();
        let mut cumulative = 0.0;
        for (index, probability) in self.probabilities.iter().enumerate() {
            cumulative += probability;
            if draw <= cumulative {
                return index;
            }
        }
        self.probabilities.len() - 1
    }

    /// Re-derive adaptive probabilities from accumulated gains.
    fn update_probabilities(&mut self) {
        let count = self.gains.len();
        if count == 0 {
            return;
        }
        let total: f64 = self.gains.iter().sum();
        if total <= 0.0 {
            self.probabilities.fill(1.0 / count as f64);
            return;
        }

        let floor = self.settings.min_probability;
        for (probability, gain) in self.probabilities.iter_mut().zip(&self.gains) {
            *probability = floor + (1.0 - floor * count as f64) * gain.max(0.0) / total;
        }
        let sum: f64 = self.probabilities.iter().sum();
        if sum > 0.0 {
            for probability in &mut self.probabilities {
                *probability /= sum;
            }
        }
    }

    /// Scan one neighborhood and record its outcome.
    fn step<R: Rng>(
        &mut self,
        kind: MoveKind,
        problem: &Problem,
        solution: &Solution,
        rng: &mut R,
    ) -> Result<Option<Solution>, SearchError> {
        let started = Instant::now();
        let result = match kind {
            MoveKind::Insert => self.insert_neighborhood(problem, solution, rng)?,
            MoveKind::Remove => self.remove_neighborhood(problem, solution, rng)?,
            MoveKind::OutOfPoolSwap => self.out_of_pool_neighborhood(problem, solution, rng)?,
            MoveKind::IntraSwap => self.intra_swap_neighborhood(problem, solution, rng)?,
            MoveKind::InterSwap => self.inter_swap_neighborhood(problem, solution, rng)?,
            MoveKind::Transfer => self.transfer_neighborhood(problem, solution, rng)?,
            MoveKind::Shift => self.shift_neighborhood(problem, solution, rng)?,
            MoveKind::ChainSwap => self.chain_swap_neighborhood(problem, solution, rng)?,
        };

        let gain = result
            .as_ref()
            .map(|next| next.revenue - solution.revenue)
            .filter(|&gain| gain > IMPROVEMENT_EPSILON);
        trace!(
            "{} neighborhood: {}",
            kind,
            gain.map_or_else(|| "no improvement".to_string(), |g| format!("+{:.3}", g))
        );
        if self.track_statistics {
            self.statistics.record(kind, started.elapsed(), gain);
        }
        Ok(result)
    }

    /// Acceptance state of one neighborhood scan in the configured mode.
    pub(crate) fn scan<'a>(&self) -> Scan<'a> {
        Scan {
            mode: self.mode,
            run: self.run,
            best: None,
        }
    }
}

/// Tracks the move a neighborhood scan will apply.
pub(crate) struct Scan<'a> {
    mode: SearchMode,
    run: RunContext,
    best: Option<Move<'a>>,
}

impl<'a> Scan<'a> {
    /// Consider one candidate. Returns `true` when the scan should stop.
    pub fn offer(&mut self, candidate: Move<'a>) -> bool {
        if !candidate.is_feasible() {
            return false;
        }
        match self.mode {
            SearchMode::Random => {
                self.best = Some(candidate);
                true
            }
            SearchMode::FirstImprovement => {
                if candidate.revenue_gain() > IMPROVEMENT_EPSILON {
                    self.best = Some(candidate);
                    true
                } else {
                    false
                }
            }
            SearchMode::BestImprovement => {
                let threshold = self
                    .best
                    .as_ref()
                    .map_or(IMPROVEMENT_EPSILON, |best| best.revenue_gain());
                if candidate.revenue_gain() > threshold {
                    self.best = Some(candidate);
                }
                false
            }
        }
    }

    /// Apply the selected move, if any.
    pub fn finish(self) -> Result<Option<Solution>, SearchError> {
        self.best.map(|chosen| chosen.apply(&self.run)).transpose()
    }
}

/// `start..end` in random order.
pub(crate) fn shuffled_range<R: Rng>(start: usize, end: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (start..end).collect();
    indices.shuffle(rng);
    indices
}

/// Every occupied `(inventory, position)` in random order.
pub(crate) fn shuffled_slots<R: Rng>(solution: &Solution, rng: &mut R) -> Vec<(usize, usize)> {
    let mut slots: Vec<(usize, usize)> = (0..solution.num_inventories())
        .flat_map(|inventory| {
            (0..solution.schedule(inventory).len()).map(move |position| (inventory, position))
        })
        .collect();
    slots.shuffle(rng);
    slots
}
