//! Transfer: move an assignment into another inventory.

use std::iter;

use super::sequence::Rewrite;
use super::{Memo, MoveContext, MoveKind, Rewriting};

/// Moves the assignment at `from_position` of `from_inventory` to
/// `to_position` of `to_inventory`.
#[derive(Debug, Clone)]
pub struct TransferMove<'a> {
    context: MoveContext<'a>,
    from_inventory: usize,
    from_position: usize,
    to_inventory: usize,
    to_position: usize,
    memo: Memo,
}

impl<'a> TransferMove<'a> {
    pub fn new(
        context: MoveContext<'a>,
        from_inventory: usize,
        from_position: usize,
        to_inventory: usize,
        to_position: usize,
    ) -> Self {
        TransferMove {
            context,
            from_inventory,
            from_position,
            to_inventory,
            to_position,
            memo: Memo::default(),
        }
    }

    pub fn from(&self) -> (usize, usize) {
        (self.from_inventory, self.from_position)
    }

    pub fn to(&self) -> (usize, usize) {
        (self.to_inventory, self.to_position)
    }
}

impl<'a> Rewriting<'a> for TransferMove<'a> {
    const KIND: MoveKind = MoveKind::Transfer;

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
        self.from_inventory != self.to_inventory
            && self.from_inventory < problem.num_inventories()
            && self.to_inventory < problem.num_inventories()
            && self.from_position < solution.schedule(self.from_inventory).len()
            && self.to_position <= solution.schedule(self.to_inventory).len()
    }

    fn passes_quick_checks(&self) -> bool {
        let MoveContext {
            problem,
            solution,
            hourly,
        } = self.context;
        let commercial = solution.schedule(self.from_inventory)[self.from_position].commercial;
        if !problem.is_suitable(commercial, self.to_inventory) {
            return false;
        }

        let duration = problem.commercial(commercial).duration;
        let source = problem.inventory(self.from_inventory);
        let target = problem.inventory(self.to_inventory);

        solution.utilization(self.to_inventory) + duration <= target.duration
            && hourly.admits(&[
                (source.hour, -(duration as i64)),
                (target.hour, duration as i64),
            ])
    }

    fn build_rewrites(&self) -> Vec<Rewrite> {
        let solution = self.context.solution;
        let commercial = solution.schedule(self.from_inventory)[self.from_position].commercial;

        let source_rest =
            Rewrite::old_commercials(solution, self.from_inventory, self.from_position + 1);
        let target_rest = iter::once(commercial).chain(Rewrite::old_commercials(
            solution,
            self.to_inventory,
            self.to_position,
        ));

        vec![
            Rewrite::splice(solution, self.from_inventory, self.from_position, source_rest),
            Rewrite::splice(solution, self.to_inventory, self.to_position, target_rest),
        ]
    }
}
