//! Standings: ordering, shared ranks, determinism and confirm/unconfirm round trips.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use wargame_tournament::logic::individual_standings;
use wargame_tournament::{
    generate_round, set_match_confirmation, standings, start_tournament, submit_match_result,
    Match, MatchResult, MatchState, Participant, RawScores, Side, SideScore, TieBreak,
    Tournament,
};

fn round_one(n: usize) -> (Tournament, Vec<Match>) {
    let mut t = Tournament::new("League", 3).unwrap();
    for i in 0..n {
        t.add_participant(Participant::new(format!("P{i}")).settled())
            .unwrap();
    }
    start_tournament(&mut t).unwrap();
    let mut rng = StdRng::seed_from_u64(8);
    let matches = generate_round(&mut t, &mut rng).unwrap();
    for (i, m) in matches.iter().enumerate().filter(|(_, m)| !m.is_bye()) {
        let scores = RawScores::new(
            SideScore::new(10 + i as u32 * 4, 100 * i as i64)
                .with_objectives(vec![true, i % 2 == 0]),
            SideScore::new(10, 50),
        );
        submit_match_result(&mut t, m.id, scores, Some(m.side_a)).unwrap();
    }
    (t, matches)
}

#[test]
fn confirm_unconfirm_confirm_round_trips() {
    let (mut t, matches) = round_one(7);
    let before_any = standings(&t);

    for m in &matches {
        set_match_confirmation(&mut t, m.id, true).unwrap();
    }
    let confirmed = standings(&t);

    let target = matches[1].id;
    set_match_confirmation(&mut t, target, false).unwrap();
    let undone = standings(&t);
    assert_ne!(undone, confirmed);

    set_match_confirmation(&mut t, target, true).unwrap();
    assert_eq!(standings(&t), confirmed);

    for m in &matches {
        set_match_confirmation(&mut t, m.id, false).unwrap();
    }
    assert_eq!(standings(&t), before_any);
}

#[test]
fn double_confirm_does_not_double_count() {
    let (mut t, matches) = round_one(4);
    set_match_confirmation(&mut t, matches[0].id, true).unwrap();
    let once = standings(&t);
    assert!(set_match_confirmation(&mut t, matches[0].id, true).is_err());
    assert_eq!(standings(&t), once);
}

#[test]
fn standings_are_deterministic_and_ordered() {
    let (mut t, matches) = round_one(9);
    for m in &matches {
        set_match_confirmation(&mut t, m.id, true).unwrap();
    }
    let first = standings(&t);
    assert_eq!(first, standings(&t));
    for pair in first.windows(2) {
        assert!(pair[0].tournament_points >= pair[1].tournament_points);
        assert!(pair[0].rank <= pair[1].rank);
        if pair[0].tournament_points == pair[1].tournament_points {
            assert!(pair[0].margin_total >= pair[1].margin_total);
        }
    }
}

#[test]
fn points_come_from_the_score_table() {
    let (mut t, matches) = round_one(2);
    let m = &matches[0];
    set_match_confirmation(&mut t, m.id, true).unwrap();
    let table = standings(&t);
    // Table 1 is an exact 10-10 draw with side A moving first.
    let a = table.iter().find(|e| e.entrant == m.side_a).unwrap();
    let b = table.iter().find(|e| Some(e.entrant) == m.side_b).unwrap();
    assert_eq!(a.tournament_points, 10.5);
    assert_eq!(b.tournament_points, 10.0);
    assert_eq!(a.objectives, 2);
}

fn played(a: &Participant, b: &Participant, pa: f64, pb: f64, ma: i64, mb: i64) -> Match {
    let mut m = Match::new(1, 1, a.id, Some(b.id));
    m.state = MatchState::Confirmed(MatchResult {
        scores: RawScores::new(SideScore::new(0, ma), SideScore::new(0, mb)),
        points_a: pa,
        points_b: pb,
        first_mover: Some(Side::A),
        submitted_at: Utc::now(),
    });
    m
}

fn players(names: &[&str]) -> Vec<Participant> {
    names.iter().map(|n| Participant::new(*n)).collect()
}

#[test]
fn sorted_by_points_then_margin() {
    let ps = players(&["A", "B", "C", "D"]);
    let matches = vec![
        played(&ps[0], &ps[1], 12.0, 8.0, 100, 50),
        played(&ps[2], &ps[3], 12.0, 8.0, 300, 20),
    ];
    let table = individual_standings(&ps, &matches, &[TieBreak::Margin]);
    let names: Vec<&str> = table.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["C", "A", "B", "D"]);
    assert_eq!(table.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
}

#[test]
fn full_ties_share_rank() {
    let ps = players(&["A", "B", "C", "D"]);
    let matches = vec![
        played(&ps[0], &ps[1], 12.0, 8.0, 100, 50),
        played(&ps[2], &ps[3], 12.0, 8.0, 100, 50),
    ];
    let table = individual_standings(&ps, &matches, &[TieBreak::Margin]);
    assert_eq!(table.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 1, 3, 3]);
    assert_eq!(table[0].name, "A");
    assert_eq!(table[1].name, "C");
}

#[test]
fn unconfirmed_matches_do_not_count() {
    let ps = players(&["A", "B"]);
    let mut m = played(&ps[0], &ps[1], 12.0, 8.0, 10, 5);
    if let MatchState::Confirmed(r) = m.state.clone() {
        m.state = MatchState::Submitted(r);
    }
    let table = individual_standings(&ps, &[m], &[]);
    assert!(table
        .iter()
        .all(|e| e.matches_played == 0 && e.tournament_points == 0.0));
}

#[test]
fn tie_break_order_is_respected() {
    let ps = players(&["A", "B", "C", "D"]);
    let mut m1 = played(&ps[0], &ps[1], 12.0, 8.0, 100, 50);
    let mut m2 = played(&ps[2], &ps[3], 12.0, 8.0, 50, 50);
    if let MatchState::Confirmed(r) = &mut m2.state {
        r.scores.a.objectives = vec![true, true];
    }
    if let MatchState::Confirmed(r) = &mut m1.state {
        r.scores.a.objectives = vec![true];
    }
    let matches = [m1, m2];
    let by_margin =
        individual_standings(&ps, &matches, &[TieBreak::Margin, TieBreak::Objectives]);
    assert_eq!(by_margin[0].name, "A");
    let by_objectives =
        individual_standings(&ps, &matches, &[TieBreak::Objectives, TieBreak::Margin]);
    assert_eq!(by_objectives[0].name, "C");
}

#[test]
fn margin_totals_saturate_instead_of_overflowing() {
    let ps = players(&["A", "B"]);
    let mut second = played(&ps[0], &ps[1], 12.0, 8.0, i64::MAX, 0);
    second.round = 2;
    let matches = [played(&ps[0], &ps[1], 12.0, 8.0, i64::MAX, 0), second];
    let table = individual_standings(&ps, &matches, &[TieBreak::Margin]);
    assert_eq!(table[0].name, "A");
    assert_eq!(table[0].margin_total, i64::MAX);
    assert_eq!(table[0].matches_played, 2);
}
