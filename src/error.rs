//! Error types for instance loading, solution verification and the search loop.
//!
//! Infeasible candidate moves are not errors; they are reported as `false`
//! by `Move::is_feasible` and discarded by the caller.

use std::fmt;
use std::io;

use crate::moves::MoveKind;

/// Errors raised while building or loading a problem instance.
#[derive(Debug)]
pub enum ProblemError {
    Io(io::Error),
    Json(serde_json::Error),
    /// A commercial lists an inventory id that does not exist.
    UnknownInventory { commercial: u32, inventory: u32 },
    /// A commercial lists the same inventory under two attention codes.
    DuplicateAttention { commercial: u32, inventory: u32 },
    DuplicateId { kind: &'static str, id: u32 },
    UnknownAttention(String),
    UnknownPricingType(String),
}

impl fmt::Display for ProblemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemError::Io(err) => write!(f, "failed to read instance: {}", err),
            ProblemError::Json(err) => write!(f, "malformed instance JSON: {}", err),
            ProblemError::UnknownInventory {
                commercial,
                inventory,
            } => write!(
                f,
                "suitable inventory with id {} for commercial {} couldn't be found",
                inventory, commercial
            ),
            ProblemError::DuplicateAttention {
                commercial,
                inventory,
            } => write!(
                f,
                "commercial {} lists inventory {} more than once",
                commercial, inventory
            ),
            ProblemError::DuplicateId { kind, id } => {
                write!(f, "duplicate {} id {}", kind, id)
            }
            ProblemError::UnknownAttention(code) => write!(f, "unknown attention code: {}", code),
            ProblemError::UnknownPricingType(code) => write!(f, "unknown pricing type: {}", code),
        }
    }
}

impl std::error::Error for ProblemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProblemError::Io(err) => Some(err),
            ProblemError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ProblemError {
    fn from(err: io::Error) -> Self {
        ProblemError::Io(err)
    }
}

impl From<serde_json::Error> for ProblemError {
    fn from(err: serde_json::Error) -> Self {
        ProblemError::Json(err)
    }
}

/// A violated schedule invariant found by [`Solution::verify`](crate::solution::Solution::verify).
///
/// Ids are the external commercial and inventory ids, not internal indices.
#[derive(Debug, Clone, PartialEq)]
pub enum FeasibilityError {
    CommercialRepeated { commercial: u32 },
    GroupAdjacency { inventory: u32, position: usize },
    HourlyLimit { hour: u32, duration: u32 },
    InventoryDuration { inventory: u32, duration: u32, limit: u32 },
    Attention { commercial: u32, inventory: u32, start_time: u32 },
    Unsuitable { commercial: u32, inventory: u32 },
    StaleAssignment { commercial: u32, inventory: u32 },
    IndexMismatch { commercial: u32 },
    RevenueMismatch { stored: f64, recomputed: f64 },
}

impl fmt::Display for FeasibilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeasibilityError::CommercialRepeated { commercial } => {
                write!(f, "commercial {} is aired more than once", commercial)
            }
            FeasibilityError::GroupAdjacency {
                inventory,
                position,
            } => write!(
                f,
                "inventory {}: positions {} and {} share a group",
                inventory,
                position,
                position + 1
            ),
            FeasibilityError::HourlyLimit { hour, duration } => write!(
                f,
                "hour {} carries {}s of commercials, above the hourly limit",
                hour, duration
            ),
            FeasibilityError::InventoryDuration {
                inventory,
                duration,
                limit,
            } => write!(
                f,
                "inventory {} is filled to {}s but only holds {}s",
                inventory, duration, limit
            ),
            FeasibilityError::Attention {
                commercial,
                inventory,
                start_time,
            } => write!(
                f,
                "commercial {} in inventory {}: attention not satisfied at {}s",
                commercial, inventory, start_time
            ),
            FeasibilityError::Unsuitable {
                commercial,
                inventory,
            } => write!(
                f,
                "commercial {} is not suitable for inventory {}",
                commercial, inventory
            ),
            FeasibilityError::StaleAssignment {
                commercial,
                inventory,
            } => write!(
                f,
                "commercial {} in inventory {}: stored timing or revenue is stale",
                commercial, inventory
            ),
            FeasibilityError::IndexMismatch { commercial } => {
                write!(f, "reverse index is out of sync for commercial {}", commercial)
            }
            FeasibilityError::RevenueMismatch { stored, recomputed } => write!(
                f,
                "stored revenue {:.4} differs from recomputed {:.4}",
                stored, recomputed
            ),
        }
    }
}

impl std::error::Error for FeasibilityError {}

/// Errors that abort a search run. Both indicate a programming error rather
/// than a property of the instance.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// `apply` was called on a move that failed its feasibility check.
    InfeasibleMove(MoveKind),
    /// Debug verification after an apply found a broken invariant.
    Verification(FeasibilityError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::InfeasibleMove(kind) => {
                write!(f, "attempted to apply an infeasible {} move", kind)
            }
            SearchError::Verification(err) => write!(f, "solution verification failed: {}", err),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::Verification(err) => Some(err),
            SearchError::InfeasibleMove(_) => None,
        }
    }
}

impl From<FeasibilityError> for SearchError {
    fn from(err: FeasibilityError) -> Self {
        SearchError::Verification(err)
    }
}
