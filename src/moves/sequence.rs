//! Tail rewrites: the common currency of all move kinds.

use crate::problem::Problem;
use crate::solution::Solution;

/// Replacement of one inventory's sequence from position `from` onward.
///
/// Positions before `from` keep their commercial, start time and revenue,
/// so checks and revenue deltas only walk `tail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Rewrite {
    pub inventory: usize,
    pub from: usize,
    /// Commercial indices occupying positions `from..` after the move.
    pub tail: Vec<usize>,
}

impl Rewrite {
    /// Build a rewrite whose sequence first differs at `first_changed`, with
    /// `rest` being the new sequence from that position to the end.
    ///
    /// When the sequence grows at its end, the old final assignment is pulled
    /// into the tail as well, because it stops being the last one.
    pub fn splice(
        solution: &Solution,
        inventory: usize,
        first_changed: usize,
        rest: impl IntoIterator<Item = usize>,
    ) -> Self {
        let old = solution.schedule(inventory);
        let from = first_changed.min(old.len().saturating_sub(1));
        let mut tail: Vec<usize> = old[from..first_changed]
            .iter()
            .map(|assignment| assignment.commercial)
            .collect();
        tail.extend(rest);
        Rewrite {
            inventory,
            from,
            tail,
        }
    }

    /// Commercials of the old sequence at positions `start..`.
    pub fn old_commercials(
        solution: &Solution,
        inventory: usize,
        start: usize,
    ) -> impl Iterator<Item = usize> + '_ {
        solution.schedule(inventory)[start..]
            .iter()
            .map(|assignment| assignment.commercial)
    }

    /// Suitability, group adjacency, attention and inventory capacity of the
    /// rewritten tail.
    pub fn is_feasible(&self, problem: &Problem, solution: &Solution) -> bool {
        let old = solution.schedule(self.inventory);
        let limit = problem.inventory(self.inventory).duration;
        let (mut time, mut previous_group) = match self.from.checked_sub(1) {
            Some(previous) => (
                old[previous].end_time,
                Some(problem.commercial(old[previous].commercial).group),
            ),
            None => (0, None),
        };
        let last_position = self.from + self.tail.len().saturating_sub(1);

        for (offset, &index) in self.tail.iter().enumerate() {
            let Some(attention) = problem.attention(index, self.inventory) else {
                return false;
            };
            let commercial = problem.commercial(index);
            if previous_group == Some(commercial.group) {
                return false;
            }
            if !attention.is_satisfied(self.from + offset, time, last_position) {
                return false;
            }
            time += commercial.duration;
            if time > limit {
                return false;
            }
            previous_group = Some(commercial.group);
        }
        true
    }

    /// Revenue of the new tail minus revenue of the tail it replaces.
    ///
    /// Differences are taken position by position, so an assignment that
    /// keeps its commercial and start time contributes exactly zero.
    pub fn revenue_delta(&self, problem: &Problem, solution: &Solution) -> f64 {
        let old = &solution.schedule(self.inventory)[self.from..];
        let mut time = self
            .from
            .checked_sub(1)
            .map_or(0, |previous| solution.schedule(self.inventory)[previous].end_time);
        let mut delta = 0.0;

        for offset in 0..self.tail.len().max(old.len()) {
            let before = old.get(offset);
            match self.tail.get(offset) {
                Some(&commercial) => {
                    let unchanged = before.map_or(false, |assignment| {
                        assignment.commercial == commercial && assignment.start_time == time
                    });
                    if !unchanged {
                        delta += problem.revenue(commercial, self.inventory, time);
                        delta -= before.map_or(0.0, |assignment| assignment.revenue);
                    }
                    time += problem.commercial(commercial).duration;
                }
                None => delta -= before.map_or(0.0, |assignment| assignment.revenue),
            }
        }
        delta
    }
}
