//! Remove neighborhood: drop an assignment.
//!
//! Removing a commercial pulls its followers forward, which can land them on
//! better rated minutes.

use rand::Rng;

use super::{shuffled_slots, LocalSearch};
use crate::error::SearchError;
use crate::moves::{Move, MoveContext};
use crate::problem::Problem;
use crate::solution::Solution;

impl LocalSearch {
    pub(crate) fn remove_neighborhood<R: Rng>(
        &self,
        problem: &Problem,
        solution: &Solution,
        rng: &mut R,
    ) -> Result<Option<Solution>, SearchError> {
        let hourly = solution.hourly_durations(problem);
        let context = MoveContext::new(problem, solution, &hourly);
        let mut scan = self.scan();

        for (inventory, position) in shuffled_slots(solution, rng) {
            if scan.offer(Move::remove(context, inventory, position)) {
                break;
            }
        }
        scan.finish()
    }
}
