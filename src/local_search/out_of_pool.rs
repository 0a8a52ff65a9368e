//! Out-of-pool neighborhood: replace an assignment with an unassigned commercial.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{shuffled_slots, LocalSearch};
use crate::error::SearchError;
use crate::moves::{Move, MoveContext};
use crate::problem::Problem;
use crate::solution::Solution;

impl LocalSearch {
    pub(crate) fn out_of_pool_neighborhood<R: Rng>(
        &self,
        problem: &Problem,
        solution: &Solution,
        rng: &mut R,
    ) -> Result<Option<Solution>, SearchError> {
        let hourly = solution.hourly_durations(problem);
        let context = MoveContext::new(problem, solution, &hourly);
        let mut scan = self.scan();

        let mut pool = solution.unassigned_commercials();
        if pool.is_empty() {
            return Ok(None);
        }

        'scan: for (inventory, position) in shuffled_slots(solution, rng) {
            pool.shuffle(rng);
            for &commercial in &pool {
                if !problem.is_suitable(commercial, inventory) {
                    continue;
                }
                if scan.offer(Move::out_of_pool_swap(context, inventory, position, commercial)) {
                    break 'scan;
                }
            }
        }
        scan.finish()
    }
}
