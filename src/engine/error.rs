//! Engine error kinds.
//!
//! Every operation validates before mutating, so a returned error always
//! leaves the match state untouched and the engine usable.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Malformed or unknown dart notation. Rejects the whole visit.
    #[error("invalid dart notation: {0:?}")]
    InvalidDart(String),

    /// More than three darts submitted in one visit.
    #[error("a visit is at most 3 darts, got {0}")]
    InvalidVisitLength(usize),

    /// Mutation attempted after the match was decided.
    #[error("match is already won")]
    MatchAlreadyWon,

    /// Undo called with an empty visit history.
    #[error("no visits to undo")]
    NothingToUndo,

    /// Checkout query outside the valid score domain.
    #[error("remaining score out of range: {0}")]
    InvalidRemaining(i64),

    /// Rejected board calibration (non-positive radius, bad ring ratios).
    #[error("invalid board calibration: {0}")]
    InvalidCalibration(String),
}
