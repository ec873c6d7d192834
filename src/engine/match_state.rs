//! Match state machine for a two-player 501 match played in legs and sets.
//!
//! `MatchState` is the root entity. It is mutated only through
//! `apply_visit`, `undo`, and `reset`; everything a reader might want
//! (active player, tallies) is derived from the recorded history, so undo
//! is a pop, never a reconstruction.

use serde::{Deserialize, Serialize};

use crate::engine::dart::Dart;
use crate::engine::error::EngineError;
use crate::engine::visit::{score_visit, Visit, VisitOutcome, MAX_DARTS_PER_VISIT};

/// One of the two players. Serialized as `1`/`2`, the ids clients use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn other(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    pub const BOTH: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];
}

impl From<PlayerId> for u8 {
    fn from(p: PlayerId) -> u8 {
        p.number()
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(PlayerId::One),
            2 => Ok(PlayerId::Two),
            _ => Err(format!("player id must be 1 or 2, got {n}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Score each player starts a leg on.
    pub starting_score: u16,
    /// Legs needed to win a set.
    pub legs_per_set: u8,
    /// Sets needed to win the match.
    pub sets_to_win: u8,
    /// Require a double (or double bull) to finish a leg.
    pub double_out: bool,
    /// Who throws first in the first leg.
    pub starting_player: PlayerId,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            starting_score: 501,
            legs_per_set: 3,
            sets_to_win: 2,
            double_out: true,
            starting_player: PlayerId::One,
        }
    }
}

/// One leg: remaining scores, the visits thrown in it, and its winner once
/// decided. Closed legs are kept whole so undo can reopen them exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegState {
    pub starting_player: PlayerId,
    pub remaining: [u16; 2],
    pub visits: Vec<Visit>,
    pub winner: Option<PlayerId>,
}

impl LegState {
    fn new(starting_player: PlayerId, starting_score: u16) -> Self {
        Self {
            starting_player,
            remaining: [starting_score; 2],
            visits: Vec::new(),
            winner: None,
        }
    }

    /// Whose turn it is in this leg. Every visit alternates the turn, so
    /// this is the starter when an even number of visits has been thrown.
    pub fn active_player(&self) -> PlayerId {
        if self.visits.len() % 2 == 0 {
            self.starting_player
        } else {
            self.starting_player.other()
        }
    }

    pub fn remaining_for(&self, player: PlayerId) -> u16 {
        self.remaining[player.index()]
    }
}

/// One set: its legs in play order (the last one is current while the set
/// is open). Leg tallies are counted from closed legs, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetState {
    pub legs: Vec<LegState>,
    pub winner: Option<PlayerId>,
}

impl SetState {
    fn new(starting_player: PlayerId, starting_score: u16) -> Self {
        Self {
            legs: vec![LegState::new(starting_player, starting_score)],
            winner: None,
        }
    }

    pub fn legs_won(&self, player: PlayerId) -> u8 {
        self.legs.iter().filter(|l| l.winner == Some(player)).count() as u8
    }

    pub fn current_leg(&self) -> &LegState {
        self.legs.last().expect("a set always holds at least one leg")
    }
}

/// The root match entity. Exactly one leg is current until the match is
/// won; the final leg and set stay in place once it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub config: MatchConfig,
    pub sets: Vec<SetState>,
    pub winner: Option<PlayerId>,
}

impl MatchState {
    pub fn new(config: MatchConfig) -> Self {
        let first = SetState::new(config.starting_player, config.starting_score);
        Self {
            config,
            sets: vec![first],
            winner: None,
        }
    }

    pub fn current_set(&self) -> &SetState {
        self.sets.last().expect("a match always holds at least one set")
    }

    pub fn current_leg(&self) -> &LegState {
        self.current_set().current_leg()
    }

    pub fn sets_won(&self, player: PlayerId) -> u8 {
        self.sets.iter().filter(|s| s.winner == Some(player)).count() as u8
    }

    /// Whose turn it is, or `None` once the match is decided.
    pub fn active_player(&self) -> Option<PlayerId> {
        if self.winner.is_some() {
            None
        } else {
            Some(self.current_leg().active_player())
        }
    }

    /// The most recently recorded visit anywhere in the match.
    pub fn last_visit(&self) -> Option<&Visit> {
        self.sets
            .iter()
            .rev()
            .flat_map(|s| s.legs.iter().rev())
            .find_map(|l| l.visits.last())
    }

    fn total_visits(&self) -> usize {
        self.sets
            .iter()
            .flat_map(|s| s.legs.iter())
            .map(|l| l.visits.len())
            .sum()
    }

    /// Validate and apply one visit for the active player.
    ///
    /// All validation happens before any mutation; a returned error leaves
    /// the state untouched.
    pub fn apply_visit(&mut self, darts: &[Dart]) -> Result<(), EngineError> {
        if self.winner.is_some() {
            return Err(EngineError::MatchAlreadyWon);
        }
        if darts.len() > MAX_DARTS_PER_VISIT {
            return Err(EngineError::InvalidVisitLength(darts.len()));
        }

        let leg = self.current_leg();
        let player = leg.active_player();
        let remaining_before = leg.remaining_for(player);
        let (remaining_after, outcome) = score_visit(remaining_before, darts, self.config.double_out);

        let set = self.sets.last_mut().expect("a match always holds at least one set");
        let leg = set.legs.last_mut().expect("a set always holds at least one leg");
        leg.visits.push(Visit {
            player,
            darts: darts.to_vec(),
            remaining_before,
            remaining_after,
            outcome,
        });
        leg.remaining[player.index()] = remaining_after;

        if outcome == VisitOutcome::Checkout {
            leg.winner = Some(player);
            self.close_leg(player);
        }
        Ok(())
    }

    /// Close out the current leg (already marked won) and open whatever
    /// comes next: the next leg, the next set, or nothing once the match
    /// is decided. The next leg's starter is the player who did not start
    /// the finished leg, across set boundaries too.
    fn close_leg(&mut self, winner: PlayerId) {
        let previous_starter = self.current_leg().starting_player;
        let next_starter = previous_starter.other();

        let set = self.sets.last_mut().expect("a match always holds at least one set");
        if set.legs_won(winner) >= self.config.legs_per_set {
            set.winner = Some(winner);
            if self.sets_won(winner) >= self.config.sets_to_win {
                self.winner = Some(winner);
                tracing::info!(player = winner.number(), "match won");
                return;
            }
            tracing::info!(player = winner.number(), "set won");
            self.sets.push(SetState::new(next_starter, self.config.starting_score));
        } else {
            tracing::debug!(player = winner.number(), "leg won");
            set.legs.push(LegState::new(next_starter, self.config.starting_score));
        }
    }

    /// Remove the single most recently recorded visit, reopening any leg,
    /// set, or match it had closed.
    pub fn undo(&mut self) -> Result<(), EngineError> {
        if self.total_visits() == 0 {
            return Err(EngineError::NothingToUndo);
        }

        if self.winner.is_some() {
            // The last visit decided the match; the final leg and set were
            // left in place with their winners recorded.
            self.winner = None;
            let set = self.sets.last_mut().expect("a match always holds at least one set");
            set.winner = None;
            let leg = set.legs.last_mut().expect("a set always holds at least one leg");
            Self::pop_visit(leg);
            return Ok(());
        }

        let fresh_set = self.sets.len() > 1
            && self.current_set().legs.len() == 1
            && self.current_leg().visits.is_empty();
        if fresh_set {
            // The last visit closed a set; drop the set it opened and
            // reopen the one it closed.
            self.sets.pop();
            let set = self.sets.last_mut().expect("a match always holds at least one set");
            set.winner = None;
            let leg = set.legs.last_mut().expect("a set always holds at least one leg");
            Self::pop_visit(leg);
        } else if self.current_leg().visits.is_empty() {
            // The last visit closed a leg within the current set.
            let set = self.sets.last_mut().expect("a match always holds at least one set");
            set.legs.pop();
            let leg = set.legs.last_mut().expect("a set always holds at least one leg");
            Self::pop_visit(leg);
        } else {
            let set = self.sets.last_mut().expect("a match always holds at least one set");
            let leg = set.legs.last_mut().expect("a set always holds at least one leg");
            Self::pop_visit(leg);
        }
        Ok(())
    }

    fn pop_visit(leg: &mut LegState) {
        let visit = leg.visits.pop().expect("undo targets a leg with visits");
        leg.remaining[visit.player.index()] = visit.remaining_before;
        leg.winner = None;
    }

    /// Discard all state and start over with the same configuration.
    pub fn reset(&mut self) {
        *self = MatchState::new(self.config.clone());
    }
}
