//! Checkout route search: exhaustive over 1-3 dart sequences that finish a
//! remaining score exactly, ranked by conventional finishing preferences.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::engine::dart::{Dart, BULL_VALUE};

/// Default number of suggestions returned.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 6;

/// Highest score finishable in three darts under double-out (T20 T20 DBULL).
pub const MAX_DOUBLE_OUT_CHECKOUT: u16 = 170;

/// Highest score finishable in three darts without the double-out rule.
pub const MAX_STRAIGHT_OUT_CHECKOUT: u16 = 180;

/// The 62 legal scoring darts: singles, doubles, and triples of 1-20 plus
/// both bulls.
static ALL_DARTS: Lazy<Vec<Dart>> = Lazy::new(|| {
    let mut darts = Vec::with_capacity(62);
    for value in 1..=20 {
        for multiplier in 1..=3 {
            darts.push(Dart { value, multiplier });
        }
    }
    darts.push(Dart { value: BULL_VALUE, multiplier: 1 });
    darts.push(Dart { value: BULL_VALUE, multiplier: 2 });
    darts
});

pub fn all_scoring_darts() -> &'static [Dart] {
    &ALL_DARTS
}

/// A route of 1-3 darts that reduces a remaining score to exactly zero,
/// with the last dart satisfying the finish rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSuggestion {
    pub darts: Vec<Dart>,
}

impl CheckoutSuggestion {
    pub fn total(&self) -> u16 {
        self.darts.iter().map(Dart::score).sum()
    }

    pub fn notations(&self) -> Vec<String> {
        self.darts.iter().map(Dart::to_string).collect()
    }
}

/// Preference weight for a single dart; lower is better. Encodes the
/// conventions most scoring apps recommend: common finishing doubles
/// first, T20/T19/T18 as setup darts, bull only when it is the obvious
/// route.
fn preference_weight(d: &Dart) -> u32 {
    if d.value == BULL_VALUE {
        return if d.multiplier == 2 { 30 } else { 60 };
    }
    if d.multiplier == 2 {
        const COMMON_DOUBLES: [u8; 9] = [20, 16, 18, 10, 8, 12, 6, 4, 2];
        if let Some(i) = COMMON_DOUBLES.iter().position(|&v| v == d.value) {
            return i as u32;
        }
        return 15 + (20 - u32::from(d.value));
    }
    if d.multiplier == 3 {
        if (16..=20).contains(&d.value) {
            return 5 + (20 - u32::from(d.value));
        }
        return 25 + (20 - u32::from(d.value));
    }
    40 + (20 - u32::from(d.value))
}

fn format_route(route: &[Dart]) -> String {
    route
        .iter()
        .map(Dart::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Sort key for routes; lower tuples are preferred. Fewer darts first,
/// then the nicer finishing dart, then nicer setup darts, with the
/// formatted route as a deterministic tie-break.
fn route_weight(route: &[Dart]) -> (usize, u32, u32, String) {
    let finish = route.last().expect("routes hold at least one dart");
    let setup: u32 = route[..route.len() - 1].iter().map(preference_weight).sum();
    (
        route.len(),
        preference_weight(finish),
        setup,
        format_route(route),
    )
}

/// Dedup key: setup darts order-insensitively, plus the finishing dart.
/// Permutations of the same setup collapse to one suggestion; routes with
/// a different finish stay distinct.
fn dedup_key(route: &[Dart]) -> String {
    let mut setup: Vec<&Dart> = route[..route.len() - 1].iter().collect();
    setup.sort_by_key(|d| (d.value, d.multiplier));
    let mut key = setup.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(",");
    key.push('|');
    key.push_str(&route[route.len() - 1].to_string());
    key
}

fn is_valid_finish(d: &Dart, double_out: bool) -> bool {
    !double_out || d.is_double()
}

/// Return up to `limit` suggested checkout routes for `remaining`.
///
/// Deterministic for a given input. Scores with no 1-3 dart finish (0, 1
/// under double-out, anything above the 170/180 ceiling, and the known
/// impossible values such as 169 and 168) yield an empty list.
pub fn suggest_checkouts(remaining: u16, double_out: bool, limit: usize) -> Vec<CheckoutSuggestion> {
    if limit == 0 || remaining == 0 {
        return Vec::new();
    }
    if double_out && (remaining < 2 || remaining > MAX_DOUBLE_OUT_CHECKOUT) {
        return Vec::new();
    }
    if !double_out && remaining > MAX_STRAIGHT_OUT_CHECKOUT {
        return Vec::new();
    }

    let mut routes: Vec<Vec<Dart>> = Vec::new();

    for &d1 in ALL_DARTS.iter() {
        if d1.score() == remaining && is_valid_finish(&d1, double_out) {
            routes.push(vec![d1]);
        }
    }

    for &d1 in ALL_DARTS.iter() {
        let Some(r1) = remaining.checked_sub(d1.score()).filter(|&r| r > 0) else {
            continue;
        };
        for &d2 in ALL_DARTS.iter() {
            if d2.score() == r1 && is_valid_finish(&d2, double_out) {
                routes.push(vec![d1, d2]);
            }
        }
    }

    for &d1 in ALL_DARTS.iter() {
        let Some(r1) = remaining.checked_sub(d1.score()).filter(|&r| r > 0) else {
            continue;
        };
        for &d2 in ALL_DARTS.iter() {
            let Some(r2) = r1.checked_sub(d2.score()).filter(|&r| r > 0) else {
                continue;
            };
            for &d3 in ALL_DARTS.iter() {
                if d3.score() == r2 && is_valid_finish(&d3, double_out) {
                    routes.push(vec![d1, d2, d3]);
                }
            }
        }
    }

    routes.sort_by_cached_key(|r| route_weight(r));

    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for route in routes {
        if !seen.insert(dedup_key(&route)) {
            continue;
        }
        out.push(CheckoutSuggestion { darts: route });
        if out.len() >= limit {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top(remaining: u16) -> Vec<String> {
        suggest_checkouts(remaining, true, DEFAULT_SUGGESTION_LIMIT)
            .first()
            .map(|s| s.notations())
            .unwrap_or_default()
    }

    #[test]
    fn test_170_is_two_triple_20s_and_double_bull() {
        assert_eq!(top(170), vec!["T20", "T20", "DBULL"]);
        assert_eq!(suggest_checkouts(170, true, 6).len(), 1);
    }

    #[test]
    fn test_impossible_scores_are_empty() {
        for remaining in [169u16, 168, 166, 165, 163, 162, 159] {
            assert!(
                suggest_checkouts(remaining, true, 6).is_empty(),
                "expected no finish for {remaining}"
            );
        }
    }

    #[test]
    fn test_out_of_domain_is_empty() {
        assert!(suggest_checkouts(0, true, 6).is_empty());
        assert!(suggest_checkouts(1, true, 6).is_empty());
        assert!(suggest_checkouts(171, true, 6).is_empty());
        assert!(suggest_checkouts(501, true, 6).is_empty());
    }

    #[test]
    fn test_40_prefers_d20_over_two_dart_routes() {
        let suggestions = suggest_checkouts(40, true, 6);
        assert_eq!(suggestions[0].notations(), vec!["D20"]);
        assert!(suggestions.iter().skip(1).all(|s| s.darts.len() >= 2));
    }

    #[test]
    fn test_2_is_d1_only_single_dart() {
        assert_eq!(top(2), vec!["D1"]);
    }

    #[test]
    fn test_50_prefers_double_bull() {
        assert_eq!(top(50), vec!["DBULL"]);
    }

    #[test]
    fn test_every_route_totals_remaining_and_ends_on_double() {
        for remaining in 2..=170u16 {
            for s in suggest_checkouts(remaining, true, 6) {
                assert_eq!(s.total(), remaining, "route {:?}", s.notations());
                assert!(
                    s.darts.last().unwrap().is_double(),
                    "route {:?} does not finish on a double",
                    s.notations()
                );
            }
        }
    }

    #[test]
    fn test_deterministic_for_a_given_remaining() {
        for remaining in [32u16, 61, 100, 141, 167] {
            let a = suggest_checkouts(remaining, true, 6);
            let b = suggest_checkouts(remaining, true, 6);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_setup_permutations_collapse() {
        for remaining in 2..=170u16 {
            let suggestions = suggest_checkouts(remaining, true, 32);
            let mut keys: Vec<String> = suggestions.iter().map(|s| dedup_key(&s.darts)).collect();
            keys.sort();
            keys.dedup();
            assert_eq!(keys.len(), suggestions.len(), "duplicates at {remaining}");
        }
    }

    #[test]
    fn test_limit_bounds_output() {
        assert!(suggest_checkouts(100, true, 2).len() <= 2);
        assert!(suggest_checkouts(100, true, 0).is_empty());
    }

    #[test]
    fn test_straight_out_allows_single_finish() {
        let suggestions = suggest_checkouts(60, false, 6);
        assert!(suggestions.iter().any(|s| s.notations() == vec!["T20"]));
    }
}
