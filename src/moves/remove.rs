//! Remove: drop an assignment.

use super::sequence::Rewrite;
use super::{Memo, MoveContext, MoveKind, Rewriting};

/// Drops the assignment at `position` of `inventory`; later assignments
/// move earlier by its duration.
#[derive(Debug, Clone)]
pub struct RemoveMove<'a> {
    context: MoveContext<'a>,
    inventory: usize,
    position: usize,
    memo: Memo,
}

impl<'a> RemoveMove<'a> {
    pub fn new(context: MoveContext<'a>, inventory: usize, position: usize) -> Self {
        RemoveMove {
            context,
            inventory,
            position,
            memo: Memo::default(),
        }
    }

    pub fn inventory(&self) -> usize {
        self.inventory
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl<'a> Rewriting<'a> for RemoveMove<'a> {
    const KIND: MoveKind = MoveKind::Remove;

    fn context(&self) -> MoveContext<'a> {
        self.context
    }

    fn memo(&self) -> &Memo {
        &self.memo
    }

    fn in_bounds(&self) -> bool {
        self.inventory < self.context.problem.num_inventories()
            && self.position < self.context.solution.schedule(self.inventory).len()
    }

    // Removing only frees capacity; group adjacency of the new neighbours is
    // checked on the tail.
    fn passes_quick_checks(&self) -> bool {
        true
    }

    fn build_rewrites(&self) -> Vec<Rewrite> {
        let solution = self.context.solution;
        let rest = Rewrite::old_commercials(solution, self.inventory, self.position + 1);
        vec![Rewrite::splice(solution, self.inventory, self.position, rest)]
    }
}
