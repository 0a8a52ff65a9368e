//! Chain swap neighborhood: rotate assignments across three inventories.
//!
//! Cubic in the number of assignments; meant for occasional use.

use rand::Rng;

use super::{shuffled_slots, LocalSearch};
use crate::error::SearchError;
use crate::moves::{Move, MoveContext};
use crate::problem::Problem;
use crate::solution::Solution;

impl LocalSearch {
    pub(crate) fn chain_swap_neighborhood<R: Rng>(
        &self,
        problem: &Problem,
        solution: &Solution,
        rng: &mut R,
    ) -> Result<Option<Solution>, SearchError> {
        let hourly = solution.hourly_durations(problem);
        let context = MoveContext::new(problem, solution, &hourly);
        let mut scan = self.scan();

        let slots = shuffled_slots(solution, rng);
        let commercial = |(inventory, position): (usize, usize)| {
            solution.schedule(inventory)[position].commercial
        };

        'scan: for (i, &a) in slots.iter().enumerate() {
            for (j, &b) in slots.iter().enumerate().skip(i + 1) {
                if b.0 == a.0 || !problem.is_suitable(commercial(a), b.0) {
                    continue;
                }
                for &c in &slots[j + 1..] {
                    if c.0 == a.0
                        || c.0 == b.0
                        || !problem.is_suitable(commercial(b), c.0)
                        || !problem.is_suitable(commercial(c), a.0)
                    {
                        continue;
                    }
                    if scan.offer(Move::chain_swap(context, [a, b, c])) {
                        break 'scan;
                    }
                }
            }
        }
        scan.finish()
    }
}
