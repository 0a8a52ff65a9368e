//! Transfer neighborhood: move an assignment into another suitable inventory.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{shuffled_range, shuffled_slots, LocalSearch};
use crate::error::SearchError;
use crate::moves::{Move, MoveContext};
use crate::problem::Problem;
use crate::solution::Solution;

impl LocalSearch {
    pub(crate) fn transfer_neighborhood<R: Rng>(
        &self,
        problem: &Problem,
        solution: &Solution,
        rng: &mut R,
    ) -> Result<Option<Solution>, SearchError> {
        let hourly = solution.hourly_durations(problem);
        let context = MoveContext::new(problem, solution, &hourly);
        let mut scan = self.scan();

        'scan: for (from_inventory, from_position) in shuffled_slots(solution, rng) {
            let commercial = solution.schedule(from_inventory)[from_position].commercial;
            let duration = problem.commercial(commercial).duration;
            let mut targets = problem.commercial(commercial).suitable_inventories().to_vec();
            targets.shuffle(rng);

            for to_inventory in targets {
                if to_inventory == from_inventory
                    || solution.utilization(to_inventory) + duration
                        > problem.inventory(to_inventory).duration
                {
                    continue;
                }
                let len = solution.schedule(to_inventory).len();
                for to_position in shuffled_range(0, len + 1, rng) {
                    let candidate = Move::transfer(
                        context,
                        from_inventory,
                        from_position,
                        to_inventory,
                        to_position,
                    );
                    if scan.offer(candidate) {
                        break 'scan;
                    }
                }
            }
        }
        scan.finish()
    }
}
