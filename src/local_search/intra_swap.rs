//! Intra swap neighborhood: exchange two assignments of one inventory.

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

use super::LocalSearch;
use crate::error::SearchError;
use crate::moves::{Move, MoveContext};
use crate::problem::Problem;
use crate::solution::Solution;

impl LocalSearch {
    pub(crate) fn intra_swap_neighborhood<R: Rng>(
        &self,
        problem: &Problem,
        solution: &Solution,
        rng: &mut R,
    ) -> Result<Option<Solution>, SearchError> {
        let hourly = solution.hourly_durations(problem);
        let context = MoveContext::new(problem, solution, &hourly);
        let mut scan = self.scan();

        let mut pairs: Vec<(usize, usize, usize)> = (0..solution.num_inventories())
            .flat_map(|inventory| {
                let len = solution.schedule(inventory).len();
                (0..len)
                    .tuple_combinations()
                    .map(move |(first, second)| (inventory, first, second))
            })
            .collect();
        pairs.shuffle(rng);

        for (inventory, first, second) in pairs {
            if scan.offer(Move::intra_swap(context, inventory, first, second)) {
                break;
            }
        }
        scan.finish()
    }
}
