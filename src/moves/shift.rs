//! Shift: move an assignment to another position of the same inventory.

use super::sequence::Rewrite;
use super::{Memo, MoveContext, MoveKind, Rewriting};

/// Moves the assignment at `from` so that it ends up at position `to` of the
/// same inventory. Assignments in between shift by its duration, towards
/// `from`.
#[derive(Debug, Clone)]
pub struct ShiftMove<'a> {
    context: MoveContext<'a>,
    inventory: usize,
    from: usize,
    to: usize,
    memo: Memo,
}

impl<'a> ShiftMove<'a> {
    pub fn new(context: MoveContext<'a>, inventory: usize, from: usize, to: usize) -> Self {
        ShiftMove {
            context,
            inventory,
            from,
            to,
            memo: Memo::default(),
        }
    }

    pub fn inventory(&self) -> usize {
        self.inventory
    }

    pub fn positions(&self) -> (usize, usize) {
        (self.from, self.to)
    }
}

impl<'a> Rewriting<'a> for ShiftMove<'a> {
    const KIND: MoveKind = MoveKind::Shift;

    fn context(&self) -> MoveContext<'a> {
        self.context
    }

    fn memo(&self) -> &Memo {
        &self.memo
    }

    fn in_bounds(&self) -> bool {
        if self.inventory >= self.context.problem.num_inventories() || self.from == self.to {
            return false;
        }
        let len = self.context.solution.schedule(self.inventory).len();
        self.from < len && self.to < len
    }

    // Same inventory, same commercials: capacity and hourly load are unchanged.
    fn passes_quick_checks(&self) -> bool {
        true
    }

    fn build_rewrites(&self) -> Vec<Rewrite> {
        let solution = self.context.solution;
        let start = self.from.min(self.to);
        let mut rest: Vec<usize> = Rewrite::old_commercials(solution, self.inventory, start).collect();
        let moved = rest.remove(self.from - start);
        rest.insert(self.to - start, moved);
        vec![Rewrite::splice(solution, self.inventory, start, rest)]
    }
}
