//! Chain swap: rotate three assignments across three inventories.

use std::iter;

use super::sequence::Rewrite;
use super::{Memo, MoveContext, MoveKind, Rewriting};

/// Rotates the assignments at three `(inventory, position)` slots: the
/// commercial of slot 0 moves to slot 1, slot 1's to slot 2 and slot 2's to
/// slot 0. The three inventories must differ.
#[derive(Debug, Clone)]
pub struct ChainSwapMove<'a> {
    context: MoveContext<'a>,
    slots: [(usize, usize); 3],
    memo: Memo,
}

impl<'a> ChainSwapMove<'a> {
    pub fn new(context: MoveContext<'a>, slots: [(usize, usize); 3]) -> Self {
        ChainSwapMove {
            context,
            slots,
            memo: Memo::default(),
        }
    }

    pub fn slots(&self) -> [(usize, usize); 3] {
        self.slots
    }

    fn commercial_at(&self, slot: usize) -> usize {
        let (inventory, position) = self.slots[slot];
        self.context.solution.schedule(inventory)[position].commercial
    }

    /// Slot whose commercial lands in `slot` after the rotation.
    fn incoming(slot: usize) -> usize {
        (slot + 2) % 3
    }
}

impl<'a> Rewriting<'a> for ChainSwapMove<'a> {
    const KIND: MoveKind = MoveKind::ChainSwap;

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
        let [(a, _), (b, _), (c, _)] = self.slots;
        a != b
            && b != c
            && a != c
            && self.slots.iter().all(|&(inventory, position)| {
                inventory < problem.num_inventories()
                    && position < solution.schedule(inventory).len()
            })
    }

    fn passes_quick_checks(&self) -> bool {
        let MoveContext {
            problem,
            solution,
            hourly,
        } = self.context;
        let mut changes = [(0u32, 0i64); 3];

        for slot in 0..3 {
            let inventory_index = self.slots[slot].0;
            let inventory = problem.inventory(inventory_index);
            let outgoing = self.commercial_at(slot);
            let incoming = self.commercial_at(Self::incoming(slot));
            if !problem.is_suitable(incoming, inventory_index) {
                return false;
            }

            let out_duration = problem.commercial(outgoing).duration;
            let in_duration = problem.commercial(incoming).duration;
            if solution.utilization(inventory_index) - out_duration + in_duration
                > inventory.duration
            {
                return false;
            }
            changes[slot] = (inventory.hour, in_duration as i64 - out_duration as i64);
        }

        hourly.admits(&changes)
    }

    fn build_rewrites(&self) -> Vec<Rewrite> {
        let solution = self.context.solution;
        (0..3)
            .map(|slot| {
                let (inventory, position) = self.slots[slot];
                let rest = iter::once(self.commercial_at(Self::incoming(slot))).chain(
                    Rewrite::old_commercials(solution, inventory, position + 1),
                );
                Rewrite::splice(solution, inventory, position, rest)
            })
            .collect()
    }
}
