//! Per-player statistics, recomputed from the visit history on every
//! read. Nothing here is stored state, so the numbers can never drift
//! from the history that produced them.

use serde::Serialize;

use crate::engine::match_state::{MatchState, PlayerId};
use crate::engine::visit::{Visit, VisitOutcome};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub player: PlayerId,
    pub visits: u32,
    /// Darts recorded, including those thrown after a bust.
    pub darts_thrown: u32,
    /// Points from non-bust visits only; a bust scores nothing.
    pub points_scored: u32,
    pub three_dart_average: f64,
    /// Non-bust visits totalling 100-139.
    pub count_100_plus: u32,
    /// Non-bust visits totalling 140-179.
    pub count_140_plus: u32,
    /// Non-bust visits totalling exactly 180.
    pub count_180: u32,
    pub highest_visit: u16,
    pub busts: u32,
    pub checkouts: u32,
    pub checkout_attempts: u32,
    pub checkout_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchStats {
    pub players: [PlayerStats; 2],
}

impl MatchStats {
    pub fn player(&self, player: PlayerId) -> &PlayerStats {
        &self.players[player.index()]
    }
}

/// A visit counts as a checkout attempt when it starts inside the
/// finishable band, whatever its outcome. This is a documented policy
/// choice, pinned by tests below.
fn is_checkout_attempt(visit: &Visit, double_out: bool) -> bool {
    let ceiling = if double_out { 170 } else { 180 };
    (2..=ceiling).contains(&visit.remaining_before)
}

fn accumulate<'a>(
    player: PlayerId,
    visits: impl Iterator<Item = &'a Visit>,
    double_out: bool,
) -> PlayerStats {
    let mut stats = PlayerStats {
        player,
        visits: 0,
        darts_thrown: 0,
        points_scored: 0,
        three_dart_average: 0.0,
        count_100_plus: 0,
        count_140_plus: 0,
        count_180: 0,
        highest_visit: 0,
        busts: 0,
        checkouts: 0,
        checkout_attempts: 0,
        checkout_percentage: 0.0,
    };

    for visit in visits.filter(|v| v.player == player) {
        stats.visits += 1;
        stats.darts_thrown += visit.darts.len() as u32;
        if is_checkout_attempt(visit, double_out) {
            stats.checkout_attempts += 1;
        }
        match visit.outcome {
            VisitOutcome::Bust => {
                stats.busts += 1;
                continue;
            }
            VisitOutcome::Checkout => stats.checkouts += 1,
            VisitOutcome::Normal => {}
        }
        let total = visit.total();
        stats.points_scored += u32::from(total);
        stats.highest_visit = stats.highest_visit.max(total);
        match total {
            100..=139 => stats.count_100_plus += 1,
            140..=179 => stats.count_140_plus += 1,
            180 => stats.count_180 += 1,
            _ => {}
        }
    }

    if stats.darts_thrown > 0 {
        stats.three_dart_average =
            f64::from(stats.points_scored) / f64::from(stats.darts_thrown) * 3.0;
    }
    if stats.checkout_attempts > 0 {
        stats.checkout_percentage =
            f64::from(stats.checkouts) / f64::from(stats.checkout_attempts) * 100.0;
    }
    stats
}

/// Fold the full visit history (every leg of every set) into per-player
/// statistics.
pub fn compute_match_stats(state: &MatchState) -> MatchStats {
    let players = PlayerId::BOTH.map(|p| {
        accumulate(
            p,
            state
                .sets
                .iter()
                .flat_map(|s| s.legs.iter())
                .flat_map(|l| l.visits.iter()),
            state.config.double_out,
        )
    });
    MatchStats { players }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::dart::Dart;
    use crate::engine::match_state::MatchConfig;

    fn darts(notations: &[&str]) -> Vec<Dart> {
        notations.iter().map(|n| Dart::parse(n).unwrap()).collect()
    }

    #[test]
    fn test_180_then_bust() {
        // 200-point legs so the second P1 visit can bust. P1 throws a 180,
        // P2 throws anything, P1 busts with all three darts recorded.
        let mut m = MatchState::new(MatchConfig {
            starting_score: 200,
            ..MatchConfig::default()
        });
        m.apply_visit(&darts(&["T20", "T20", "T20"])).unwrap();
        m.apply_visit(&darts(&["S5", "S5", "S5"])).unwrap();
        m.apply_visit(&darts(&["T20", "S5", "S5"])).unwrap(); // 20 - 60: bust

        let stats = compute_match_stats(&m);
        let p1 = stats.player(PlayerId::One);
        assert_eq!(p1.count_180, 1);
        assert_eq!(p1.busts, 1);
        assert_eq!(p1.darts_thrown, 6);
        assert_eq!(p1.points_scored, 180);
    }

    #[test]
    fn test_busted_points_are_excluded() {
        let mut m = MatchState::new(MatchConfig {
            starting_score: 10,
            ..MatchConfig::default()
        });
        m.apply_visit(&darts(&["T4"])).unwrap(); // 10 - 12: bust
        m.apply_visit(&darts(&["S6"])).unwrap(); // 10 -> 4

        let stats = compute_match_stats(&m);
        assert_eq!(stats.player(PlayerId::One).busts, 1);
        assert_eq!(stats.player(PlayerId::One).points_scored, 0);
        assert_eq!(stats.player(PlayerId::Two).busts, 0);
        assert_eq!(stats.player(PlayerId::Two).points_scored, 6);
    }

    #[test]
    fn test_three_dart_average() {
        let mut m = MatchState::new(MatchConfig::default());
        m.apply_visit(&darts(&["T20", "T20", "T20"])).unwrap(); // P1: 180 in 3
        m.apply_visit(&darts(&["S1"])).unwrap(); // P2: 1 in 1

        let stats = compute_match_stats(&m);
        assert!((stats.player(PlayerId::One).three_dart_average - 180.0).abs() < 1e-9);
        assert!((stats.player(PlayerId::Two).three_dart_average - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_scoring_bands_are_disjoint() {
        let mut m = MatchState::new(MatchConfig::default());
        m.apply_visit(&darts(&["T20", "S20", "S20"])).unwrap(); // P1: 100
        m.apply_visit(&darts(&["S1"])).unwrap();
        m.apply_visit(&darts(&["T20", "T20", "S20"])).unwrap(); // P1: 140
        m.apply_visit(&darts(&["S1"])).unwrap();
        m.apply_visit(&darts(&["T20", "T20", "T20"])).unwrap(); // P1: 180

        let p1 = compute_match_stats(&m);
        let p1 = p1.player(PlayerId::One);
        assert_eq!(p1.count_100_plus, 1);
        assert_eq!(p1.count_140_plus, 1);
        assert_eq!(p1.count_180, 1);
        assert_eq!(p1.highest_visit, 180);
    }

    #[test]
    fn test_checkout_attempt_policy() {
        // Starting on 40 is inside the finishable band: both the conversion
        // and an ordinary scoring visit from 40 count as attempts.
        let mut m = MatchState::new(MatchConfig {
            starting_score: 40,
            ..MatchConfig::default()
        });
        m.apply_visit(&darts(&["S10"])).unwrap(); // P1: 40 -> 30, an attempt
        m.apply_visit(&darts(&["D20"])).unwrap(); // P2: converts

        let stats = compute_match_stats(&m);
        assert_eq!(stats.player(PlayerId::One).checkout_attempts, 1);
        assert_eq!(stats.player(PlayerId::One).checkouts, 0);
        assert_eq!(stats.player(PlayerId::Two).checkout_attempts, 1);
        assert_eq!(stats.player(PlayerId::Two).checkouts, 1);
        assert!((stats.player(PlayerId::Two).checkout_percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_attempts_only_inside_finishable_band() {
        let mut m = MatchState::new(MatchConfig::default());
        m.apply_visit(&darts(&["T20", "T20", "T20"])).unwrap(); // from 501: not an attempt
        let stats = compute_match_stats(&m);
        assert_eq!(stats.player(PlayerId::One).checkout_attempts, 0);
        assert!((stats.player(PlayerId::One).checkout_percentage - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_history_spans_legs_and_sets() {
        let mut m = MatchState::new(MatchConfig {
            starting_score: 40,
            legs_per_set: 1,
            sets_to_win: 2,
            ..MatchConfig::default()
        });
        m.apply_visit(&darts(&["D20"])).unwrap(); // P1 takes set 1
        m.apply_visit(&darts(&["D20"])).unwrap(); // P2 starts and takes set 2

        let stats = compute_match_stats(&m);
        assert_eq!(stats.player(PlayerId::One).checkouts, 1);
        assert_eq!(stats.player(PlayerId::Two).checkouts, 1);
        assert_eq!(stats.player(PlayerId::One).visits, 1);
        assert_eq!(stats.player(PlayerId::Two).visits, 1);
    }

    #[test]
    fn test_empty_match_is_all_zero() {
        let stats = compute_match_stats(&MatchState::new(MatchConfig::default()));
        for p in &stats.players {
            assert_eq!(p.darts_thrown, 0);
            assert!((p.three_dart_average - 0.0).abs() < 1e-9);
            assert!((p.checkout_percentage - 0.0).abs() < 1e-9);
        }
    }
}
