//! Drive full matches through the public engine API: scripted 501 legs,
//! leg/set/match transitions, undo across every kind of boundary, and
//! stats computed over the recorded history.

use logan_match_engine::engine::checkout::suggest_checkouts;
use logan_match_engine::engine::dart::Dart;
use logan_match_engine::engine::match_state::{MatchConfig, MatchState, PlayerId};
use logan_match_engine::engine::stats::compute_match_stats;
use logan_match_engine::engine::visit::{score_visit, VisitOutcome};

fn darts(notations: &[&str]) -> Vec<Dart> {
    notations.iter().map(|n| Dart::parse(n).unwrap()).collect()
}

fn apply(m: &mut MatchState, notations: &[&str]) {
    m.apply_visit(&darts(notations))
        .unwrap_or_else(|e| panic!("visit {notations:?} rejected: {e}"));
}

#[test]
fn nine_dart_leg_of_501() {
    let mut m = MatchState::new(MatchConfig::default());

    apply(&mut m, &["T20", "T20", "T20"]); // P1: 501 -> 321
    apply(&mut m, &["S20", "S20", "S5"]); // P2: 501 -> 456
    apply(&mut m, &["T20", "T20", "T20"]); // P1: 321 -> 141
    apply(&mut m, &["S20", "S20", "S20"]); // P2: 456 -> 396
    apply(&mut m, &["T20", "T19", "D12"]); // P1: 141 -> 0, checkout

    assert_eq!(m.current_set().legs_won(PlayerId::One), 1);
    // The closed leg sits behind the freshly opened one.
    let closed = &m.current_set().legs[0];
    assert_eq!(closed.winner, Some(PlayerId::One));
    assert_eq!(closed.visits.last().unwrap().outcome, VisitOutcome::Checkout);
    assert_eq!(closed.remaining, [0, 396]);
    // P2 starts the next leg on a fresh 501.
    assert_eq!(m.active_player(), Some(PlayerId::Two));
    assert_eq!(m.current_leg().remaining, [501, 501]);

    let stats = compute_match_stats(&m);
    let p1 = stats.player(PlayerId::One);
    assert_eq!(p1.darts_thrown, 9);
    assert_eq!(p1.points_scored, 501);
    assert_eq!(p1.count_180, 2);
    assert_eq!(p1.checkouts, 1);
    assert_eq!(p1.checkout_attempts, 1); // only the visit from 141
    assert!((p1.three_dart_average - 167.0).abs() < 1e-9);
    assert!((p1.checkout_percentage - 100.0).abs() < 1e-9);
}

#[test]
fn checkout_from_170_with_the_suggested_route() {
    let mut m = MatchState::new(MatchConfig::default());

    // Bring P1 down to exactly 170, then finish with T20 T20 BULL.
    apply(&mut m, &["T20", "T20", "T20"]); // 501 -> 321
    apply(&mut m, &["S1"]);
    apply(&mut m, &["T20", "T19", "S14"]); // 321 -> 190
    apply(&mut m, &["S1"]);
    apply(&mut m, &["S20"]); // 190 -> 170
    apply(&mut m, &["S1"]);
    apply(&mut m, &["T20", "T20", "BULL"]); // 170 -> 0

    let closed = &m.current_set().legs[0];
    assert_eq!(closed.winner, Some(PlayerId::One));
    assert_eq!(closed.visits.last().unwrap().outcome, VisitOutcome::Checkout);
    assert!(closed.visits.last().unwrap().darts.last().unwrap().is_double());
}

#[test]
fn undo_walks_a_whole_match_back_to_fresh() {
    // Tiny match so the walk crosses leg, set, and match boundaries.
    let config = MatchConfig {
        starting_score: 60,
        legs_per_set: 2,
        sets_to_win: 2,
        double_out: true,
        starting_player: PlayerId::One,
    };
    let mut m = MatchState::new(config);

    let mut snapshots = vec![m.clone()];
    while m.winner.is_none() {
        let visit: &[&str] = match m.active_player().unwrap() {
            PlayerId::One => &["S20", "D20"], // 60 -> 0 in two darts
            PlayerId::Two => &["S10"],
        };
        m.apply_visit(&darts(visit)).unwrap();
        snapshots.push(m.clone());
    }
    assert_eq!(m.winner, Some(PlayerId::One));

    while snapshots.len() > 1 {
        snapshots.pop();
        m.undo().unwrap();
        assert_eq!(&m, snapshots.last().unwrap());
    }
    assert_eq!(m, MatchState::new(snapshots[0].config.clone()));
    assert!(m.undo().is_err());
}

#[test]
fn every_top_suggestion_actually_checks_out() {
    for remaining in 2..=170u16 {
        for suggestion in suggest_checkouts(remaining, true, 3) {
            let (after, outcome) = score_visit(remaining, &suggestion.darts, true);
            assert_eq!(
                (after, outcome),
                (0, VisitOutcome::Checkout),
                "suggestion {:?} for {remaining} does not finish",
                suggestion.notations()
            );
        }
    }
}

#[test]
fn match_state_round_trips_through_json() {
    let mut m = MatchState::new(MatchConfig::default());
    apply(&mut m, &["T20", "T20", "T20"]);
    apply(&mut m, &["T20", "S5", "S5"]);
    apply(&mut m, &["T19", "D10", "S3"]);

    let json = serde_json::to_string(&m).unwrap();
    let back: MatchState = serde_json::from_str(&json).unwrap();
    assert_eq!(m, back);
}
