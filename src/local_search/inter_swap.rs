//! Inter swap neighborhood: exchange assignments of two inventories.

use rand::Rng;

use super::{shuffled_slots, LocalSearch};
use crate::error::SearchError;
use crate::moves::{Move, MoveContext};
use crate::problem::Problem;
use crate::solution::Solution;

impl LocalSearch {
    pub(crate) fn inter_swap_neighborhood<R: Rng>(
        &self,
        problem: &Problem,
        solution: &Solution,
        rng: &mut R,
    ) -> Result<Option<Solution>, SearchError> {
        let hourly = solution.hourly_durations(problem);
        let context = MoveContext::new(problem, solution, &hourly);
        let mut scan = self.scan();

        let slots = shuffled_slots(solution, rng);
        'scan: for (i, &(first_inventory, first_position)) in slots.iter().enumerate() {
            let first = solution.schedule(first_inventory)[first_position].commercial;
            for &(second_inventory, second_position) in &slots[i + 1..] {
                if second_inventory == first_inventory {
                    continue;
                }
                let second = solution.schedule(second_inventory)[second_position].commercial;
                if !problem.is_suitable(first, second_inventory)
                    || !problem.is_suitable(second, first_inventory)
                {
                    continue;
                }
                let candidate = Move::inter_swap(
                    context,
                    first_inventory,
                    first_position,
                    second_inventory,
                    second_position,
                );
                if scan.offer(candidate) {
                    break 'scan;
                }
            }
        }
        scan.finish()
    }
}
