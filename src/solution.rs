//! Schedule representation.
//!
//! A [`Solution`] keeps one ordered sequence of [`Assignment`]s per inventory.
//! Sequences sit behind `Arc`, so a move that rewrites two inventories clones
//! only those two and shares the rest with the solution it started from.
//! Solutions are never mutated once built; every move produces a new one.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::FeasibilityError;
use crate::moves::sequence::Rewrite;
use crate::problem::{Problem, HOURLY_LIMIT};

/// A commercial placed in an inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Commercial index.
    pub commercial: usize,
    /// Inventory index.
    pub inventory: usize,
    pub start_time: u32,
    pub end_time: u32,
    pub revenue: f64,
    pub position: usize,
}

impl Assignment {
    /// Place a commercial at `position`, starting at `start_time`.
    pub fn place(
        problem: &Problem,
        commercial: usize,
        inventory: usize,
        position: usize,
        start_time: u32,
    ) -> Self {
        Assignment {
            commercial,
            inventory,
            start_time,
            end_time: start_time + problem.commercial(commercial).duration,
            revenue: problem.revenue(commercial, inventory, start_time),
            position,
        }
    }
}

/// Location of an assigned commercial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub inventory: usize,
    pub position: usize,
}

/// A complete schedule with a reverse index and its total revenue.
#[derive(Clone, PartialEq)]
pub struct Solution {
    schedules: Vec<Arc<Vec<Assignment>>>,
    /// Commercial index -> slot, `None` when unassigned.
    index: Vec<Option<Slot>>,
    pub revenue: f64,
}

impl Solution {
    /// Create a solution with every inventory empty.
    pub fn empty(problem: &Problem) -> Self {
        Solution {
            schedules: vec![Arc::new(Vec::new()); problem.num_inventories()],
            index: vec![None; problem.num_commercials()],
            revenue: 0.0,
        }
    }

    /// Build a solution from per-inventory lists of commercial indices in
    /// broadcast order. Start times and revenues are derived from the order.
    pub fn from_sequences(problem: &Problem, sequences: &[Vec<usize>]) -> Self {
        let mut solution = Solution::empty(problem);
        for (inventory, sequence) in sequences.iter().enumerate() {
            let mut schedule = Vec::with_capacity(sequence.len());
            let mut time = 0;
            for (position, &commercial) in sequence.iter().enumerate() {
                let assignment = Assignment::place(problem, commercial, inventory, position, time);
                time = assignment.end_time;
                solution.revenue += assignment.revenue;
                solution.index[commercial] = Some(Slot {
                    inventory,
                    position,
                });
                schedule.push(assignment);
            }
            solution.schedules[inventory] = Arc::new(schedule);
        }
        solution
    }

    /// Assignments of one inventory in broadcast order.
    #[inline]
    pub fn schedule(&self, inventory: usize) -> &[Assignment] {
        &self.schedules[inventory]
    }

    pub fn num_inventories(&self) -> usize {
        self.schedules.len()
    }

    /// Commercial indices of one inventory in broadcast order.
    pub fn sequence(&self, inventory: usize) -> Vec<usize> {
        self.schedules[inventory]
            .iter()
            .map(|assignment| assignment.commercial)
            .collect()
    }

    /// All sequences, suitable for [`Solution::from_sequences`].
    pub fn sequences(&self) -> Vec<Vec<usize>> {
        (0..self.schedules.len())
            .map(|inventory| self.sequence(inventory))
            .collect()
    }

    #[inline]
    pub fn slot(&self, commercial: usize) -> Option<Slot> {
        self.index[commercial]
    }

    /// Slots indexed by commercial, in ascending commercial order.
    pub fn slots(&self) -> &[Option<Slot>] {
        &self.index
    }

    pub fn assignment(&self, commercial: usize) -> Option<&Assignment> {
        self.index[commercial].map(|slot| &self.schedules[slot.inventory][slot.position])
    }

    #[inline]
    pub fn is_assigned(&self, commercial: usize) -> bool {
        self.index[commercial].is_some()
    }

    /// Seconds filled in an inventory.
    #[inline]
    pub fn utilization(&self, inventory: usize) -> u32 {
        self.schedules[inventory]
            .last()
            .map_or(0, |assignment| assignment.end_time)
    }

    pub fn num_assigned(&self) -> usize {
        self.index.iter().filter(|slot| slot.is_some()).count()
    }

    /// Commercial indices not placed anywhere, ascending.
    pub fn unassigned_commercials(&self) -> Vec<usize> {
        (0..self.index.len())
            .filter(|&commercial| self.index[commercial].is_none())
            .collect()
    }

    /// Commercial indices placed somewhere, ascending.
    pub fn assigned_commercials(&self) -> Vec<usize> {
        (0..self.index.len())
            .filter(|&commercial| self.index[commercial].is_some())
            .collect()
    }

    /// Seconds scheduled per broadcast hour.
    pub fn hourly_durations(&self, problem: &Problem) -> HourlyDurations {
        let mut hourly = HourlyDurations::new(problem);
        for (inventory, schedule) in self.schedules.iter().enumerate() {
            let hour = problem.inventory(inventory).hour;
            for assignment in schedule.iter() {
                hourly.add(hour, problem.commercial(assignment.commercial).duration);
            }
        }
        hourly
    }

    /// Sum of stored assignment revenues, ignoring the running total.
    pub fn recomputed_revenue(&self) -> f64 {
        self.schedules
            .iter()
            .flat_map(|schedule| schedule.iter())
            .map(|assignment| assignment.revenue)
            .sum()
    }

    /// Materialize rewritten inventory tails into a new solution.
    pub(crate) fn rewritten(&self, problem: &Problem, rewrites: &[Rewrite], gain: f64) -> Solution {
        let mut next = self.clone();

        // Clear every displaced commercial first so a commercial moving
        // between two rewritten inventories ends up indexed once.
        for rewrite in rewrites {
            for assignment in &self.schedules[rewrite.inventory][rewrite.from..] {
                next.index[assignment.commercial] = None;
            }
        }

        for rewrite in rewrites {
            let old = &self.schedules[rewrite.inventory];
            let mut schedule = Vec::with_capacity(rewrite.from + rewrite.tail.len());
            schedule.extend_from_slice(&old[..rewrite.from]);
            let mut time = schedule.last().map_or(0, |assignment| assignment.end_time);
            for &commercial in &rewrite.tail {
                let position = schedule.len();
                let assignment =
                    Assignment::place(problem, commercial, rewrite.inventory, position, time);
                time = assignment.end_time;
                next.index[commercial] = Some(Slot {
                    inventory: rewrite.inventory,
                    position,
                });
                schedule.push(assignment);
            }
            next.schedules[rewrite.inventory] = Arc::new(schedule);
        }

        next.revenue = self.revenue + gain;
        next
    }

    /// Independently re-verify every schedule invariant.
    ///
    /// Used after each move in debug runs and by tests; never on the hot path.
    pub fn verify(&self, problem: &Problem) -> Result<(), FeasibilityError> {
        let mut seen = HashSet::new();
        let mut hourly = HourlyDurations::new(problem);
        let mut recomputed = 0.0;

        for (inventory_index, schedule) in self.schedules.iter().enumerate() {
            let inventory = problem.inventory(inventory_index);
            let last_position = schedule.len().saturating_sub(1);
            let mut time = 0;

            for (position, assignment) in schedule.iter().enumerate() {
                let commercial = problem.commercial(assignment.commercial);
                if !seen.insert(assignment.commercial) {
                    return Err(FeasibilityError::CommercialRepeated {
                        commercial: commercial.id,
                    });
                }
                if self.index[assignment.commercial]
                    != Some(Slot {
                        inventory: inventory_index,
                        position,
                    })
                {
                    return Err(FeasibilityError::IndexMismatch {
                        commercial: commercial.id,
                    });
                }

                let expected_revenue =
                    problem.revenue(assignment.commercial, inventory_index, time);
                if assignment.inventory != inventory_index
                    || assignment.position != position
                    || assignment.start_time != time
                    || assignment.end_time != time + commercial.duration
                    || (assignment.revenue - expected_revenue).abs() > 1e-9
                {
                    return Err(FeasibilityError::StaleAssignment {
                        commercial: commercial.id,
                        inventory: inventory.id,
                    });
                }

                let attention = problem
                    .attention(assignment.commercial, inventory_index)
                    .ok_or(FeasibilityError::Unsuitable {
                        commercial: commercial.id,
                        inventory: inventory.id,
                    })?;
                if !attention.is_satisfied(position, time, last_position) {
                    return Err(FeasibilityError::Attention {
                        commercial: commercial.id,
                        inventory: inventory.id,
                        start_time: time,
                    });
                }

                if position > 0 {
                    let previous = problem.commercial(schedule[position - 1].commercial);
                    if previous.group == commercial.group {
                        return Err(FeasibilityError::GroupAdjacency {
                            inventory: inventory.id,
                            position: position - 1,
                        });
                    }
                }

                hourly.add(inventory.hour, commercial.duration);
                recomputed += assignment.revenue;
                time += commercial.duration;
            }

            if time > inventory.duration {
                return Err(FeasibilityError::InventoryDuration {
                    inventory: inventory.id,
                    duration: time,
                    limit: inventory.duration,
                });
            }
        }

        if seen.len() != self.num_assigned() {
            let stray = (0..self.index.len())
                .find(|commercial| self.index[*commercial].is_some() && !seen.contains(commercial))
                .unwrap_or_default();
            return Err(FeasibilityError::IndexMismatch {
                commercial: problem.commercial(stray).id,
            });
        }

        for &hour in problem.hours() {
            if hourly.get(hour) > HOURLY_LIMIT {
                return Err(FeasibilityError::HourlyLimit {
                    hour,
                    duration: hourly.get(hour),
                });
            }
        }

        if (recomputed - self.revenue).abs() > 1e-6 * recomputed.abs().max(1.0) {
            return Err(FeasibilityError::RevenueMismatch {
                stored: self.revenue,
                recomputed,
            });
        }

        Ok(())
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution:")?;
        writeln!(f, "  Revenue: {:.2}", self.revenue)?;
        writeln!(f, "  Assigned: {}", self.num_assigned())?;

        for (i, schedule) in self.schedules.iter().enumerate() {
            let commercials: Vec<usize> = schedule.iter().map(|a| a.commercial).collect();
            let filled = schedule.last().map_or(0, |a| a.end_time);
            writeln!(f, "  Inventory {}: {:?} (Filled: {}s)", i, commercials, filled)?;
        }

        Ok(())
    }
}

/// Per-hour accumulator of scheduled seconds, indexed by hour of day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyDurations {
    totals: Vec<u32>,
}

impl HourlyDurations {
    /// Create an all-zero accumulator covering every hour of the problem.
    pub fn new(problem: &Problem) -> Self {
        let size = problem.hours().last().map_or(0, |&hour| hour as usize + 1);
        HourlyDurations {
            totals: vec![0; size],
        }
    }

    #[inline]
    pub fn get(&self, hour: u32) -> u32 {
        self.totals.get(hour as usize).copied().unwrap_or(0)
    }

    pub fn add(&mut self, hour: u32, duration: u32) {
        let hour = hour as usize;
        if hour >= self.totals.len() {
            self.totals.resize(hour + 1, 0);
        }
        self.totals[hour] += duration;
    }

    /// Whether `extra` more seconds fit into `hour`.
    #[inline]
    pub fn fits(&self, hour: u32, extra: u32) -> bool {
        self.get(hour) + extra <= HOURLY_LIMIT
    }

    /// Whether a set of signed per-hour changes keeps every hour within the
    /// limit. Changes to the same hour are netted first.
    pub fn admits(&self, changes: &[(u32, i64)]) -> bool {
        changes.iter().enumerate().all(|(i, &(hour, _))| {
            // Evaluate each hour once, at its first occurrence.
            if changes[..i].iter().any(|&(earlier, _)| earlier == hour) {
                return true;
            }
            let net: i64 = changes
                .iter()
                .filter(|&&(other, _)| other == hour)
                .map(|&(_, delta)| delta)
                .sum();
            net <= 0 || self.get(hour) as i64 + net <= HOURLY_LIMIT as i64
        })
    }
}
