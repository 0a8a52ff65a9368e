//! Move framework shared by local search and path relinking.
//!
//! Every move kind reduces to a set of [`Rewrite`]s: for each inventory it
//! touches, the position where its sequence starts to differ and the new
//! sequence from there on. Feasibility, revenue gain and application are all
//! computed from those tails, so a move never scans inventories it does not
//! touch. Results are memoized per move instance.

pub mod chain_swap;
pub mod insert;
pub mod inter_swap;
pub mod intra_swap;
pub mod out_of_pool_swap;
pub mod remove;
pub mod sequence;
pub mod shift;
pub mod transfer;

use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::fmt;
use std::str::FromStr;

use crate::error::SearchError;
use crate::problem::Problem;
use crate::solution::{HourlyDurations, Solution};

pub use self::chain_swap::ChainSwapMove;
pub use self::insert::InsertMove;
pub use self::inter_swap::InterSwapMove;
pub use self::intra_swap::IntraSwapMove;
pub use self::out_of_pool_swap::OutOfPoolSwapMove;
pub use self::remove::RemoveMove;
pub use self::shift::ShiftMove;
pub use self::transfer::TransferMove;

use self::sequence::Rewrite;

/// The eight move kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MoveKind {
    #[serde(rename = "insert")]
    Insert,
    #[serde(rename = "remove")]
    Remove,
    #[serde(rename = "outOfPool", alias = "outOfPoolSwap")]
    OutOfPoolSwap,
    #[serde(rename = "intraSwap")]
    IntraSwap,
    #[serde(rename = "interSwap")]
    InterSwap,
    #[serde(rename = "transfer")]
    Transfer,
    #[serde(rename = "shift")]
    Shift,
    #[serde(rename = "chainSwap")]
    ChainSwap,
}

impl MoveKind {
    pub const ALL: [MoveKind; 8] = [
        MoveKind::Insert,
        MoveKind::Remove,
        MoveKind::OutOfPoolSwap,
        MoveKind::IntraSwap,
        MoveKind::InterSwap,
        MoveKind::Transfer,
        MoveKind::Shift,
        MoveKind::ChainSwap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MoveKind::Insert => "insert",
            MoveKind::Remove => "remove",
            MoveKind::OutOfPoolSwap => "outOfPool",
            MoveKind::IntraSwap => "intraSwap",
            MoveKind::InterSwap => "interSwap",
            MoveKind::Transfer => "transfer",
            MoveKind::Shift => "shift",
            MoveKind::ChainSwap => "chainSwap",
        }
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MoveKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "outOfPoolSwap" => Ok(MoveKind::OutOfPoolSwap),
            _ => MoveKind::ALL
                .iter()
                .copied()
                .find(|kind| kind.name() == s)
                .ok_or_else(|| format!("unknown move kind: {}", s)),
        }
    }
}

/// Flags threaded from the driver into every `apply`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunContext {
    /// Re-verify the full solution after every applied move.
    pub debug: bool,
}

impl RunContext {
    pub fn new(debug: bool) -> Self {
        RunContext { debug }
    }
}

/// Borrowed state every move is evaluated against.
///
/// `hourly` must describe `solution`; it is built once per neighborhood scan
/// instead of once per candidate.
#[derive(Debug, Clone, Copy)]
pub struct MoveContext<'a> {
    pub problem: &'a Problem,
    pub solution: &'a Solution,
    pub hourly: &'a HourlyDurations,
}

impl<'a> MoveContext<'a> {
    pub fn new(problem: &'a Problem, solution: &'a Solution, hourly: &'a HourlyDurations) -> Self {
        MoveContext {
            problem,
            solution,
            hourly,
        }
    }
}

/// Memoized evaluation results of one move instance.
#[derive(Debug, Clone, Default)]
pub(crate) struct Memo {
    feasible: OnceCell<bool>,
    gain: OnceCell<f64>,
    rewrites: OnceCell<Vec<Rewrite>>,
}

/// Implemented by every move kind; `Move` dispatches to it by pattern match.
pub(crate) trait Rewriting<'a> {
    const KIND: MoveKind;

    fn context(&self) -> MoveContext<'a>;

    fn memo(&self) -> &Memo;

    /// Indices refer to existing commercials, inventories and positions.
    fn in_bounds(&self) -> bool;

    /// Checks that need no sequence rewrite: assignment status, suitability,
    /// inventory capacity and the hourly limit.
    fn passes_quick_checks(&self) -> bool;

    /// New tails of every touched inventory. Only called when in bounds.
    fn build_rewrites(&self) -> Vec<Rewrite>;

    fn rewrites(&self) -> &[Rewrite] {
        self.memo().rewrites.get_or_init(|| self.build_rewrites())
    }

    fn is_feasible(&self) -> bool {
        *self.memo().feasible.get_or_init(|| {
            if !self.in_bounds() || !self.passes_quick_checks() {
                return false;
            }
            let context = self.context();
            self.rewrites()
                .iter()
                .all(|rewrite| rewrite.is_feasible(context.problem, context.solution))
        })
    }

    fn revenue_gain(&self) -> f64 {
        *self.memo().gain.get_or_init(|| {
            if !self.in_bounds() {
                return f64::NEG_INFINITY;
            }
            let context = self.context();
            self.rewrites()
                .iter()
                .map(|rewrite| rewrite.revenue_delta(context.problem, context.solution))
                .sum()
        })
    }

    fn apply(&self, run: &RunContext) -> Result<Solution, SearchError> {
        if !self.is_feasible() {
            return Err(SearchError::InfeasibleMove(Self::KIND));
        }
        let context = self.context();
        let next = context
            .solution
            .rewritten(context.problem, self.rewrites(), self.revenue_gain());
        if run.debug {
            next.verify(context.problem)?;
        }
        Ok(next)
    }
}

/// A candidate modification of a solution.
#[derive(Debug, Clone)]
pub enum Move<'a> {
    Insert(InsertMove<'a>),
    Remove(RemoveMove<'a>),
    OutOfPoolSwap(OutOfPoolSwapMove<'a>),
    IntraSwap(IntraSwapMove<'a>),
    InterSwap(InterSwapMove<'a>),
    Transfer(TransferMove<'a>),
    Shift(ShiftMove<'a>),
    ChainSwap(ChainSwapMove<'a>),
}

macro_rules! dispatch {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            Move::Insert($m) => $body,
            Move::Remove($m) => $body,
            Move::OutOfPoolSwap($m) => $body,
            Move::IntraSwap($m) => $body,
            Move::InterSwap($m) => $body,
            Move::Transfer($m) => $body,
            Move::Shift($m) => $body,
            Move::ChainSwap($m) => $body,
        }
    };
}

impl<'a> Move<'a> {
    /// Place unassigned `commercial` at `position` of `inventory`.
    pub fn insert(
        context: MoveContext<'a>,
        commercial: usize,
        inventory: usize,
        position: usize,
    ) -> Self {
        Move::Insert(InsertMove::new(context, commercial, inventory, position))
    }

    /// Drop the assignment at `position` of `inventory`.
    pub fn remove(context: MoveContext<'a>, inventory: usize, position: usize) -> Self {
        Move::Remove(RemoveMove::new(context, inventory, position))
    }

    /// Replace the assignment at `position` with unassigned `commercial`.
    pub fn out_of_pool_swap(
        context: MoveContext<'a>,
        inventory: usize,
        position: usize,
        commercial: usize,
    ) -> Self {
        Move::OutOfPoolSwap(OutOfPoolSwapMove::new(
            context, inventory, position, commercial,
        ))
    }

    /// Exchange positions `first < second` of one inventory.
    pub fn intra_swap(
        context: MoveContext<'a>,
        inventory: usize,
        first: usize,
        second: usize,
    ) -> Self {
        Move::IntraSwap(IntraSwapMove::new(context, inventory, first, second))
    }

    /// Exchange one assignment each between two different inventories.
    pub fn inter_swap(
        context: MoveContext<'a>,
        first_inventory: usize,
        first_position: usize,
        second_inventory: usize,
        second_position: usize,
    ) -> Self {
        Move::InterSwap(InterSwapMove::new(
            context,
            first_inventory,
            first_position,
            second_inventory,
            second_position,
        ))
    }

    /// Move one assignment into another inventory at `to_position`.
    pub fn transfer(
        context: MoveContext<'a>,
        from_inventory: usize,
        from_position: usize,
        to_inventory: usize,
        to_position: usize,
    ) -> Self {
        Move::Transfer(TransferMove::new(
            context,
            from_inventory,
            from_position,
            to_inventory,
            to_position,
        ))
    }

    /// Move one assignment from `from` to `to` within the same inventory.
    pub fn shift(context: MoveContext<'a>, inventory: usize, from: usize, to: usize) -> Self {
        Move::Shift(ShiftMove::new(context, inventory, from, to))
    }

    /// Rotate three assignments of three distinct inventories: the first
    /// commercial takes the second slot, the second the third, and the
    /// third the first.
    pub fn chain_swap(context: MoveContext<'a>, slots: [(usize, usize); 3]) -> Self {
        Move::ChainSwap(ChainSwapMove::new(context, slots))
    }

    pub fn kind(&self) -> MoveKind {
        match self {
            Move::Insert(_) => MoveKind::Insert,
            Move::Remove(_) => MoveKind::Remove,
            Move::OutOfPoolSwap(_) => MoveKind::OutOfPoolSwap,
            Move::IntraSwap(_) => MoveKind::IntraSwap,
            Move::InterSwap(_) => MoveKind::InterSwap,
            Move::Transfer(_) => MoveKind::Transfer,
            Move::Shift(_) => MoveKind::Shift,
            Move::ChainSwap(_) => MoveKind::ChainSwap,
        }
    }

    /// Whether applying the move keeps every schedule invariant. Memoized.
    pub fn is_feasible(&self) -> bool {
        dispatch!(self, m => m.is_feasible())
    }

    /// Exact revenue change if the move were applied. Memoized.
    pub fn revenue_gain(&self) -> f64 {
        dispatch!(self, m => m.revenue_gain())
    }

    /// Build the resulting solution. The source solution is left untouched.
    ///
    /// Calling this on an infeasible move is a programming error and
    /// returns [`SearchError::InfeasibleMove`].
    pub fn apply(&self, run: &RunContext) -> Result<Solution, SearchError> {
        dispatch!(self, m => m.apply(run))
    }
}
