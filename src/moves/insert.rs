//! Insert: place an unassigned commercial into an inventory.

use std::iter;

use super::sequence::Rewrite;
use super::{Memo, MoveContext, MoveKind, Rewriting};

/// Places unassigned `commercial` at `position` of `inventory`; assignments
/// from `position` on shift later by its duration.
#[derive(Debug, Clone)]
pub struct InsertMove<'a> {
    context: MoveContext<'a>,
    commercial: usize,
    inventory: usize,
    position: usize,
    memo: Memo,
}

impl<'a> InsertMove<'a> {
    pub fn new(
        context: MoveContext<'a>,
        commercial: usize,
        inventory: usize,
        position: usize,
    ) -> Self {
        InsertMove {
            context,
            commercial,
            inventory,
            position,
            memo: Memo::default(),
        }
    }

    pub fn commercial(&self) -> usize {
        self.commercial
    }

    pub fn inventory(&self) -> usize {
        self.inventory
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl<'a> Rewriting<'a> for InsertMove<'a> {
    const KIND: MoveKind = MoveKind::Insert;

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
            && self.position <= solution.schedule(self.inventory).len()
    }

    fn passes_quick_checks(&self) -> bool {
        let MoveContext {
            problem,
            solution,
            hourly,
        } = self.context;
        let inventory = problem.inventory(self.inventory);
        let duration = problem.commercial(self.commercial).duration;

        !solution.is_assigned(self.commercial)
            && problem.is_suitable(self.commercial, self.inventory)
            && solution.utilization(self.inventory) + duration <= inventory.duration
            && hourly.fits(inventory.hour, duration)
    }

    fn build_rewrites(&self) -> Vec<Rewrite> {
        let solution = self.context.solution;
        let rest = iter::once(self.commercial).chain(Rewrite::old_commercials(
            solution,
            self.inventory,
            self.position,
        ));
        vec![Rewrite::splice(solution, self.inventory, self.position, rest)]
    }
}
