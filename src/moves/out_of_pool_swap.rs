//! Out-of-pool swap: replace an assignment with an unassigned commercial.

use std::iter;

use super::sequence::Rewrite;
use super::{Memo, MoveContext, MoveKind, Rewriting};

/// Replaces the assignment at `position` of `inventory` with unassigned
/// `commercial`. Followers shift by the difference of the two durations.
#[derive(Debug, Clone)]
pub struct OutOfPoolSwapMove<'a> {
    context: MoveContext<'a>,
    inventory: usize,
    position: usize,
    commercial: usize,
    memo: Memo,
}

impl<'a> OutOfPoolSwapMove<'a> {
    pub fn new(
        context: MoveContext<'a>,
        inventory: usize,
        position: usize,
        commercial: usize,
    ) -> Self {
        OutOfPoolSwapMove {
            context,
            inventory,
            position,
            commercial,
            memo: Memo::default(),
        }
    }

    pub fn inventory(&self) -> usize {
        self.inventory
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The incoming commercial.
    pub fn commercial(&self) -> usize {
        self.commercial
    }
}

impl<'a> Rewriting<'a> for OutOfPoolSwapMove<'a> {
    const KIND: MoveKind = MoveKind::OutOfPoolSwap;

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
        self.commercial < problem.num_commercials()
            && self.inventory < problem.num_inventories()
            && self.position < solution.schedule(self.inventory).len()
    }

    fn passes_quick_checks(&self) -> bool {
        let MoveContext {
            problem,
            solution,
            hourly,
        } = self.context;
        if solution.is_assigned(self.commercial)
            || !problem.is_suitable(self.commercial, self.inventory)
        {
            return false;
        }

        let inventory = problem.inventory(self.inventory);
        let outgoing = solution.schedule(self.inventory)[self.position].commercial;
        let old_duration = problem.commercial(outgoing).duration;
        let new_duration = problem.commercial(self.commercial).duration;
        if new_duration <= old_duration {
            return true;
        }
        let growth = new_duration - old_duration;
        solution.utilization(self.inventory) + growth <= inventory.duration
            && hourly.fits(inventory.hour, growth)
    }

    fn build_rewrites(&self) -> Vec<Rewrite> {
        let solution = self.context.solution;
        let rest = iter::once(self.commercial).chain(Rewrite::old_commercials(
            solution,
            self.inventory,
            self.position + 1,
        ));
        vec![Rewrite::splice(solution, self.inventory, self.position, rest)]
    }
}
