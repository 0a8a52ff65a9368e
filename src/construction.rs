//! Semi-greedy randomized construction.
//!
//! Commercials are appended one at a time to the end of an inventory. Each
//! step scores every feasible (commercial, inventory) pair by revenue per
//! second, keeps the pairs scoring at least `best − α(best − worst)` and
//! picks one of them uniformly.

use rand::Rng;

use crate::config::ConstructionSettings;
use crate::problem::{Attention, Problem, MISSING_RATING_REVENUE};
use crate::solution::{HourlyDurations, Solution};

/// Append-only state of one inventory during construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackRecord {
    /// Seconds filled so far.
    pub current_time: u32,
    /// Group of the most recently appended commercial.
    pub latest_group: Option<u32>,
    pub any_assigned: bool,
    /// A LAST commercial closes the inventory.
    pub last_assigned: bool,
}

impl TrackRecord {
    /// Whether appending a commercial with this attention requirement keeps
    /// the inventory feasible, ignoring the hourly limit.
    pub fn admits(&self, duration: u32, group: u32, attention: Attention, limit: u32) -> bool {
        if self.last_assigned
            || self.current_time + duration > limit
            || self.latest_group == Some(group)
        {
            return false;
        }
        match attention {
            Attention::None | Attention::Last => true,
            Attention::First => !self.any_assigned,
            Attention::F30 => self.current_time <= 30,
            Attention::F60 => self.current_time <= 60,
        }
    }

    fn append(&mut self, duration: u32, group: u32, attention: Attention) {
        self.current_time += duration;
        self.latest_group = Some(group);
        self.any_assigned = true;
        self.last_assigned = attention == Attention::Last;
    }
}

/// Score multipliers for attention-constrained commercials, drawn once per
/// construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boosts {
    pub first: f64,
    pub last: f64,
    pub f30: f64,
    pub f60: f64,
}

impl Boosts {
    pub fn sample<R: Rng>(settings: &ConstructionSettings, rng: &mut R) -> Self {
        let mut draw = || {
            if settings.boost_upper > settings.boost_lower {
                rng.gen_range(settings.boost_lower..settings.boost_upper)
            } else {
                settings.boost_lower
            }
        };
        Boosts {
            first: draw(),
            last: draw(),
            f30: draw(),
            f60: draw(),
        }
    }

    pub fn factor(&self, attention: Attention) -> f64 {
        match attention {
            Attention::None => 1.0,
            Attention::First => self.first,
            Attention::Last => self.last,
            Attention::F30 => self.f30,
            Attention::F60 => self.f60,
        }
    }
}

/// Builds feasible solutions from scratch.
#[derive(Debug, Clone)]
pub struct ConstructiveHeuristic<'a> {
    problem: &'a Problem,
    settings: ConstructionSettings,
}

impl<'a> ConstructiveHeuristic<'a> {
    pub fn new(problem: &'a Problem, settings: ConstructionSettings) -> Self {
        ConstructiveHeuristic { problem, settings }
    }

    /// Build one solution with greediness `alpha` (0 is pure greedy, 1 is
    /// uniform over all feasible candidates).
    pub fn construct<R: Rng>(&self, alpha: f64, rng: &mut R) -> Solution {
        let problem = self.problem;
        let boosts = Boosts::sample(&self.settings, rng);
        let mut records = vec![TrackRecord::default(); problem.num_inventories()];
        let mut sequences = vec![Vec::new(); problem.num_inventories()];
        let mut hourly = HourlyDurations::new(problem);
        let mut unassigned: Vec<usize> = (0..problem.num_commercials()).collect();
        let mut candidates = Vec::new();

        while !unassigned.is_empty() {
            candidates.clear();
            let mut best = f64::NEG_INFINITY;
            let mut worst = f64::INFINITY;

            for (slot, &commercial) in unassigned.iter().enumerate() {
                for &inventory in problem.commercial(commercial).suitable_inventories() {
                    let Some(score) =
                        self.score(commercial, inventory, &records[inventory], &hourly, &boosts)
                    else {
                        continue;
                    };
                    best = best.max(score);
                    worst = worst.min(score);
                    candidates.push((slot, inventory, score));
                }
            }

            let threshold = best - alpha * (best - worst);
            let Some((slot, inventory)) = reservoir_pick(&candidates, threshold, rng) else {
                break;
            };

            let commercial = unassigned.swap_remove(slot);
            let details = problem.commercial(commercial);
            let attention = problem
                .attention(commercial, inventory)
                .unwrap_or(Attention::None);
            records[inventory].append(details.duration, details.group, attention);
            hourly.add(problem.inventory(inventory).hour, details.duration);
            sequences[inventory].push(commercial);
        }

        Solution::from_sequences(problem, &sequences)
    }

    /// Greedy score of appending `commercial` to `inventory`, or `None` when
    /// the append is infeasible or has no rating.
    fn score(
        &self,
        commercial: usize,
        inventory: usize,
        record: &TrackRecord,
        hourly: &HourlyDurations,
        boosts: &Boosts,
    ) -> Option<f64> {
        let problem = self.problem;
        let details = problem.commercial(commercial);
        let slot = problem.inventory(inventory);
        let attention = problem.attention(commercial, inventory)?;

        if !record.admits(details.duration, details.group, attention, slot.duration)
            || !hourly.fits(slot.hour, details.duration)
        {
            return None;
        }

        let revenue = problem.revenue(commercial, inventory, record.current_time);
        if revenue <= MISSING_RATING_REVENUE {
            return None;
        }

        if attention == Attention::Last {
            let remaining = slot.duration - record.current_time;
            if remaining as f64 > details.duration as f64 * self.settings.last_coefficient {
                return Some(0.0);
            }
        }

        Some(revenue / details.duration.max(1) as f64 * boosts.factor(attention))
    }
}

/// Uniform pick among candidates scoring at least `threshold`, in one pass.
fn reservoir_pick<R: Rng>(
    candidates: &[(usize, usize, f64)],
    threshold: f64,
    rng: &mut R,
) -> Option<(usize, usize)> {
    let mut chosen = None;
    let mut count = 0;
    for &(slot, inventory, score) in candidates {
        if score >= threshold {
            count += 1;
            if rng.gen_range(0..count) == 0 {
                chosen = Some((slot, inventory));
            }
        }
    }
    chosen
}
