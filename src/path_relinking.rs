//! Mixed path relinking between two solutions.
//!
//! Two walkers start at the endpoints and take turns stepping toward each
//! other's current solution. Steps use only insert, remove and transfer
//! moves, since each of them reduces the distance by one.

use log::trace;
use rand::Rng;

use crate::error::SearchError;
use crate::moves::{Move, MoveContext, RunContext};
use crate::problem::Problem;
use crate::solution::Solution;

/// Number of commercials assigned in both solutions but to different
/// inventories, plus those assigned in exactly one of them.
///
/// Zero exactly when both solutions assign every commercial to the same
/// inventory; order within an inventory is ignored.
pub fn distance(first: &Solution, second: &Solution) -> usize {
    first
        .slots()
        .iter()
        .zip(second.slots())
        .filter(|(a, b)| match (a, b) {
            (Some(a), Some(b)) => a.inventory != b.inventory,
            (None, None) => false,
            _ => true,
        })
        .count()
}

/// Walks between two solutions and keeps the best one seen.
#[derive(Debug, Clone, Copy)]
pub struct PathRelinking {
    /// Probability of taking a uniformly random feasible step instead of the
    /// best one.
    random_move_probability: f64,
    run: RunContext,
}

impl PathRelinking {
    /// `coefficient` scales `random_move_probability`.
    pub fn new(coefficient: f64, random_move_probability: f64, run: RunContext) -> Self {
        PathRelinking {
            random_move_probability: coefficient * random_move_probability,
            run,
        }
    }

    /// Relink `initial` and `guiding`. The result is the best solution on
    /// the path, starting with `initial` itself.
    pub fn relink<R: Rng>(
        &self,
        problem: &Problem,
        initial: &Solution,
        guiding: &Solution,
        rng: &mut R,
    ) -> Result<Solution, SearchError> {
        let mut best = initial.clone();
        let mut current = initial.clone();
        let mut target = guiding.clone();
        let mut failures = 0;
        let mut steps = 0;

        while distance(&current, &target) > 1 {
            match self.step(problem, &current, &target, rng)? {
                Some(next) => {
                    failures = 0;
                    steps += 1;
                    if next.revenue > best.revenue {
                        best = next.clone();
                    }
                    current = next;
                }
                None => {
                    failures += 1;
                    if failures >= 2 {
                        break;
                    }
                }
            }
            std::mem::swap(&mut current, &mut target);
        }

        trace!(
            "path relinking took {} steps, best {:.3} from {:.3}",
            steps,
            best.revenue,
            initial.revenue
        );
        Ok(best)
    }

    /// One step from `current` toward `target`, or `None` if no feasible
    /// distance-reducing move exists.
    pub fn step<R: Rng>(
        &self,
        problem: &Problem,
        current: &Solution,
        target: &Solution,
        rng: &mut R,
    ) -> Result<Option<Solution>, SearchError> {
        let hourly = current.hourly_durations(problem);
        let context = MoveContext::new(problem, current, &hourly);
        let mut selection = Selection::default();

        for (commercial, (here, there)) in current.slots().iter().zip(target.slots()).enumerate() {
            match (here, there) {
                (Some(here), Some(there)) if here.inventory != there.inventory => {
                    let len = current.schedule(there.inventory).len();
                    for position in 0..=len {
                        selection.offer(
                            Move::transfer(
                                context,
                                here.inventory,
                                here.position,
                                there.inventory,
                                position,
                            ),
                            rng,
                        );
                    }
                }
                (Some(here), None) => {
                    selection.offer(Move::remove(context, here.inventory, here.position), rng);
                }
                (None, Some(there)) => {
                    let len = current.schedule(there.inventory).len();
                    for position in 0..=len {
                        selection.offer(
                            Move::insert(context, commercial, there.inventory, position),
                            rng,
                        );
                    }
                }
                _ => {}
            }
        }

        let chosen = if rng.gen::<f64>() < self.random_move_probability {
            selection.random
        } else {
            selection.best
        };
        chosen.map(|step| step.apply(&self.run)).transpose()
    }
}

/// Best-gain move and a reservoir-sampled random move among feasible ones.
#[derive(Default)]
struct Selection<'a> {
    best: Option<Move<'a>>,
    best_gain: f64,
    random: Option<Move<'a>>,
    count: usize,
}

impl<'a> Selection<'a> {
    fn offer<R: Rng>(&mut self, candidate: Move<'a>, rng: &mut R) {
        if !candidate.is_feasible() {
            return;
        }
        self.count += 1;
        let gain = candidate.revenue_gain();
        let better = self.best.is_none() || gain > self.best_gain;
        let sampled = rng.gen_range(0..self.count) == 0;

        if sampled {
            self.random = Some(candidate.clone());
        }
        if better {
            self.best_gain = gain;
            self.best = Some(candidate);
        }
    }
}
