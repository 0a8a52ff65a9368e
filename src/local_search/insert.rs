//! Insert neighborhood: place an unassigned commercial.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{shuffled_range, LocalSearch};
use crate::error::SearchError;
use crate::moves::{Move, MoveContext};
use crate::problem::Problem;
use crate::solution::Solution;

impl LocalSearch {
    /// Try every unassigned commercial at every position of every suitable
    /// inventory.
    pub(crate) fn insert_neighborhood<R: Rng>(
        &self,
        problem: &Problem,
        solution: &Solution,
        rng: &mut R,
    ) -> Result<Option<Solution>, SearchError> {
        let hourly = solution.hourly_durations(problem);
        let context = MoveContext::new(problem, solution, &hourly);
        let mut scan = self.scan();

        let mut commercials = solution.unassigned_commercials();
        commercials.shuffle(rng);

        'scan: for commercial in commercials {
            let duration = problem.commercial(commercial).duration;
            let mut inventories = problem.commercial(commercial).suitable_inventories().to_vec();
            inventories.shuffle(rng);

            for inventory in inventories {
                if solution.utilization(inventory) + duration > problem.inventory(inventory).duration {
                    continue;
                }
                let len = solution.schedule(inventory).len();
                for position in shuffled_range(0, len + 1, rng) {
                    if scan.offer(Move::insert(context, commercial, inventory, position)) {
                        break 'scan;
                    }
                }
            }
        }
        scan.finish()
    }
}
