//! Intra swap: exchange two assignments of one inventory.

use std::iter;

use super::sequence::Rewrite;
use super::{Memo, MoveContext, MoveKind, Rewriting};

/// Exchanges positions `first < second` of `inventory`. Assignments strictly
/// between them shift by the duration difference; the rest keep their times.
#[derive(Debug, Clone)]
pub struct IntraSwapMove<'a> {
    context: MoveContext<'a>,
    inventory: usize,
    first: usize,
    second: usize,
    memo: Memo,
}

impl<'a> IntraSwapMove<'a> {
    pub fn new(context: MoveContext<'a>, inventory: usize, first: usize, second: usize) -> Self {
        IntraSwapMove {
            context,
            inventory,
            first,
            second,
            memo: Memo::default(),
        }
    }

    pub fn inventory(&self) -> usize {
        self.inventory
    }

    pub fn positions(&self) -> (usize, usize) {
        (self.first, self.second)
    }
}

impl<'a> Rewriting<'a> for IntraSwapMove<'a> {
    const KIND: MoveKind = MoveKind::IntraSwap;

    fn context(&self) -> MoveContext<'a> {
        self.context
    }

    fn memo(&self) -> &Memo {
        &self.memo
    }

    fn in_bounds(&self) -> bool {
        self.inventory < self.context.problem.num_inventories()
            && self.first < self.second
            && self.second < self.context.solution.schedule(self.inventory).len()
    }

    // Total duration is unchanged, so capacity and hourly load are too.
    fn passes_quick_checks(&self) -> bool {
        true
    }

    fn build_rewrites(&self) -> Vec<Rewrite> {
        let solution = self.context.solution;
        let schedule = solution.schedule(self.inventory);
        let rest = iter::once(schedule[self.second].commercial)
            .chain(
                schedule[self.first + 1..self.second]
                    .iter()
                    .map(|assignment| assignment.commercial),
            )
            .chain(iter::once(schedule[self.first].commercial))
            .chain(Rewrite::old_commercials(
                solution,
                self.inventory,
                self.second + 1,
            ));
        vec![Rewrite::splice(solution, self.inventory, self.first, rest)]
    }
}
