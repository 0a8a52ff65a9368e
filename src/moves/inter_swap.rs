//! Inter swap: exchange assignments between two inventories.

use std::iter;

use super::sequence::Rewrite;
use super::{Memo, MoveContext, MoveKind, Rewriting};

/// Exchanges the assignment at `first_position` of `first_inventory` with
/// the one at `second_position` of `second_inventory`. Each commercial takes
/// the other's start time; both suffixes shift by the duration difference.
#[derive(Debug, Clone)]
pub struct InterSwapMove<'a> {
    context: MoveContext<'a>,
    first_inventory: usize,
    first_position: usize,
    second_inventory: usize,
    second_position: usize,
    memo: Memo,
}

impl<'a> InterSwapMove<'a> {
    pub fn new(
        context: MoveContext<'a>,
        first_inventory: usize,
        first_position: usize,
        second_inventory: usize,
        second_position: usize,
    ) -> Self {
        InterSwapMove {
            context,
            first_inventory,
            first_position,
            second_inventory,
            second_position,
            memo: Memo::default(),
        }
    }

    pub fn first(&self) -> (usize, usize) {
        (self.first_inventory, self.first_position)
    }

    pub fn second(&self) -> (usize, usize) {
        (self.second_inventory, self.second_position)
    }
}

impl<'a> Rewriting<'a> for InterSwapMove<'a> {
    const KIND: MoveKind = MoveKind::InterSwap;

    fn context(&self) -> MoveContext<'a> {
        self.context
    }

    fn memo(&self) -> &Memo {
        &self.memo
    }

    fn in_bounds(&self) -> bool {
        let MoveContext {
            problem, solution, ..
        } = self.context;
        self.first_inventory != self.second_inventory
            && self.first_inventory < problem.num_inventories()
            && self.second_inventory < problem.num_inventories()
            && self.first_position < solution.schedule(self.first_inventory).len()
            && self.second_position < solution.schedule(self.second_inventory).len()
    }

    fn passes_quick_checks(&self) -> bool {
        let MoveContext {
            problem,
            solution,
            hourly,
        } = self.context;
        let first = solution.schedule(self.first_inventory)[self.first_position].commercial;
        let second = solution.schedule(self.second_inventory)[self.second_position].commercial;
        if !problem.is_suitable(first, self.second_inventory)
            || !problem.is_suitable(second, self.first_inventory)
        {
            return false;
        }

        let first_duration = problem.commercial(first).duration;
        let second_duration = problem.commercial(second).duration;
        let first_inventory = problem.inventory(self.first_inventory);
        let second_inventory = problem.inventory(self.second_inventory);

        let first_fill = solution.utilization(self.first_inventory) - first_duration + second_duration;
        let second_fill =
            solution.utilization(self.second_inventory) - second_duration + first_duration;
        let shift = second_duration as i64 - first_duration as i64;

        first_fill <= first_inventory.duration
            && second_fill <= second_inventory.duration
            && hourly.admits(&[
                (first_inventory.hour, shift),
                (second_inventory.hour, -shift),
            ])
    }

    fn build_rewrites(&self) -> Vec<Rewrite> {
        let solution = self.context.solution;
        let first = solution.schedule(self.first_inventory)[self.first_position].commercial;
        let second = solution.schedule(self.second_inventory)[self.second_position].commercial;

        let first_rest = iter::once(second).chain(Rewrite::old_commercials(
            solution,
            self.first_inventory,
            self.first_position + 1,
        ));
        let second_rest = iter::once(first).chain(Rewrite::old_commercials(
            solution,
            self.second_inventory,
            self.second_position + 1,
        ));

        vec![
            Rewrite::splice(solution, self.first_inventory, self.first_position, first_rest),
            Rewrite::splice(
                solution,
                self.second_inventory,
                self.second_position,
                second_rest,
            ),
        ]
    }
}
