//! Visit scoring: apply up to three darts to a remaining score and
//! classify the outcome.

use serde::{Deserialize, Serialize};

use crate::engine::dart::Dart;
use crate::engine::match_state::PlayerId;

/// A visit is at most three darts.
pub const MAX_DARTS_PER_VISIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitOutcome {
    Normal,
    Bust,
    Checkout,
}

/// One player's recorded turn: the darts thrown plus the scores around it.
/// Immutable once recorded, except via undo (which removes it whole).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub player: PlayerId,
    pub darts: Vec<Dart>,
    pub remaining_before: u16,
    pub remaining_after: u16,
    pub outcome: VisitOutcome,
}

impl Visit {
    /// Points this visit scored. Zero for a bust (the throw reverts).
    pub fn total(&self) -> u16 {
        match self.outcome {
            VisitOutcome::Bust => 0,
            _ => self.remaining_before - self.remaining_after,
        }
    }
}

/// Apply `darts` in order against `remaining_before`.
///
/// Per-dart rules: going below zero busts; leaving exactly 1 busts (under
/// double-out there is no 1-point finish); landing exactly on 0 finishes
/// only when it happens on the final submitted dart and (under double-out)
/// that dart is a double — reaching 0 on an earlier dart busts, since the
/// visit must end on the finishing dart. A bust stops scoring immediately;
/// the remaining darts stay recorded on the visit but never score.
pub fn score_visit(remaining_before: u16, darts: &[Dart], double_out: bool) -> (u16, VisitOutcome) {
    let mut running = i32::from(remaining_before);
    for (i, dart) in darts.iter().enumerate() {
        running -= i32::from(dart.score());
        if running < 0 || (double_out && running == 1) {
            return (remaining_before, VisitOutcome::Bust);
        }
        if running == 0 {
            let is_last = i + 1 == darts.len();
            if is_last && (dart.is_double() || !double_out) {
                return (0, VisitOutcome::Checkout);
            }
            return (remaining_before, VisitOutcome::Bust);
        }
    }
    (running as u16, VisitOutcome::Normal)
}
