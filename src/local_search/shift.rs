//! Shift neighborhood: move an assignment within its inventory.

use itertools::iproduct;
use rand::seq::SliceRandom;
use rand::Rng;

use super::LocalSearch;
use crate::error::SearchError;
use crate::moves::{Move, MoveContext};
use crate::problem::Problem;
use crate::solution::Solution;

impl LocalSearch {
    pub(crate) fn shift_neighborhood<R: Rng>(
        &self,
        problem: &Problem,
        solution: &Solution,
        rng: &mut R,
    ) -> Result<Option<Solution>, SearchError> {
        let hourly = solution.hourly_durations(problem);
        let context = MoveContext::new(problem, solution, &hourly);
        let mut scan = self.scan();

        let mut shifts: Vec<(usize, usize, usize)> = (0..solution.num_inventories())
            .flat_map(|inventory| {
                let len = solution.schedule(inventory).len();
                iproduct!(0..len, 0..len)
                    .filter(|(from, to)| from != to)
                    .map(move |(from, to)| (inventory, from, to))
            })
            .collect();
        shifts.shuffle(rng);

        for (inventory, from, to) in shifts {
            if scan.offer(Move::shift(context, inventory, from, to)) {
                break;
            }
        }
        scan.finish()
    }
}
