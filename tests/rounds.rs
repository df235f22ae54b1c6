//! Integration tests for round control: pairing, byes, confirmation and advancing.

use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;
use wargame_tournament::{
    advance_round, clear_round, generate_round, open_round, set_match_confirmation, standings,
    start_tournament, submit_match_result, Match, Participant, RawScores, SideScore, Tournament,
    TournamentError, TournamentState,
};

fn tournament_with_players(n: usize, rounds: u32) -> Tournament {
    let mut t = Tournament::new("Club Night", rounds).unwrap();
    for i in 0..n {
        t.add_participant(Participant::new(format!("P{i}")).settled())
            .unwrap();
    }
    start_tournament(&mut t).unwrap();
    t
}

/// Side A wins by `diff` primary points.
fn play(t: &mut Tournament, m: &Match, diff: u32) {
    let scores = RawScores::new(SideScore::new(10 + diff, 0), SideScore::new(10, 0));
    submit_match_result(t, m.id, scores, Some(m.side_a)).unwrap();
}

fn play_and_confirm_round(t: &mut Tournament, matches: &[Match]) {
    for m in matches {
        if !m.is_bye() {
            play(t, m, 5);
        }
        set_match_confirmation(t, m.id, true).unwrap();
    }
}

#[test]
fn five_players_get_two_matches_and_a_bye() {
    let mut t = tournament_with_players(5, 3);
    let mut rng = StdRng::seed_from_u64(11);
    let matches = generate_round(&mut t, &mut rng).unwrap();
    assert_eq!(matches.len(), 3);
    assert_eq!(matches.iter().filter(|m| m.is_bye()).count(), 1);

    let bye = matches.iter().find(|m| m.is_bye()).unwrap();
    assert!(bye.result().is_some());
    assert!(!bye.is_confirmed());

    play_and_confirm_round(&mut t, &matches);
    let table = standings(&t);
    assert_eq!(table.len(), 5);
    let bye_entry = table.iter().find(|e| e.entrant == bye.side_a).unwrap();
    assert_eq!(bye_entry.tournament_points, t.rules.bye.points);
    assert_eq!(bye_entry.byes, 1);
    assert_eq!(bye_entry.matches_played, 1);
}

#[test]
fn unconfirmed_bye_does_not_count() {
    let mut t = tournament_with_players(3, 3);
    let mut rng = StdRng::seed_from_u64(5);
    let matches = generate_round(&mut t, &mut rng).unwrap();
    let bye = matches.iter().find(|m| m.is_bye()).unwrap();
    let entry = standings(&t)
        .into_iter()
        .find(|e| e.entrant == bye.side_a)
        .unwrap();
    assert_eq!(entry.tournament_points, 0.0);
}

#[test]
fn advance_fails_while_any_match_unconfirmed() {
    let mut t = tournament_with_players(4, 3);
    let mut rng = StdRng::seed_from_u64(1);
    let matches = generate_round(&mut t, &mut rng).unwrap();
    play(&mut t, &matches[0], 3);
    play(&mut t, &matches[1], 3);
    set_match_confirmation(&mut t, matches[0].id, true).unwrap();

    match advance_round(&mut t) {
        Err(TournamentError::RoundIncomplete { round, pending }) => {
            assert_eq!(round, 1);
            assert_eq!(pending.len(), 1);
        }
        other => panic!("expected RoundIncomplete, got {other:?}"),
    }
    assert_eq!(t.current_round, 1);

    set_match_confirmation(&mut t, matches[1].id, true).unwrap();
    advance_round(&mut t).unwrap();
    assert_eq!(t.current_round, 2);
}

#[test]
fn second_round_is_swiss_without_rematches() {
    let mut t = tournament_with_players(8, 3);
    let mut rng = StdRng::seed_from_u64(99);
    let first = generate_round(&mut t, &mut rng).unwrap();
    play_and_confirm_round(&mut t, &first);
    advance_round(&mut t).unwrap();

    let second = generate_round(&mut t, &mut rng).unwrap();
    assert_eq!(second.len(), 4);
    for m in &second {
        let b = m.side_b.unwrap();
        assert!(!first
            .iter()
            .any(|f| (f.side_a == m.side_a && f.side_b == Some(b))
                || (f.side_a == b && f.side_b == Some(m.side_a))));
        assert_eq!(m.round, 2);
    }
    // Round-one winners meet each other at the top tables.
    let winners: Vec<_> = first.iter().map(|m| m.side_a).collect();
    assert!(winners.contains(&second[0].side_a));
    assert!(winners.contains(&second[0].side_b.unwrap()));
}

#[test]
fn final_round_finishes_tournament() {
    let mut t = tournament_with_players(4, 1);
    let mut rng = StdRng::seed_from_u64(2);
    let matches = generate_round(&mut t, &mut rng).unwrap();
    play_and_confirm_round(&mut t, &matches);
    advance_round(&mut t).unwrap();
    assert_eq!(t.state, TournamentState::Finished);
    assert_eq!(t.current_round, 1);
    assert!(generate_round(&mut t, &mut rng).is_err());
    assert!(matches!(
        set_match_confirmation(&mut t, matches[0].id, false),
        Err(TournamentError::State { .. })
    ));
}

#[test]
fn byes_rotate_across_rounds() {
    let mut t = tournament_with_players(5, 3);
    let mut rng = StdRng::seed_from_u64(21);
    let mut bye_holders = Vec::new();
    for _ in 0..3 {
        let matches = generate_round(&mut t, &mut rng).unwrap();
        let byes: Vec<_> = matches.iter().filter(|m| m.is_bye()).collect();
        assert_eq!(byes.len(), 1);
        bye_holders.push(byes[0].side_a);
        play_and_confirm_round(&mut t, &matches);
        advance_round(&mut t).unwrap();
    }
    let mut distinct = bye_holders.clone();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct.len(), 3);
    assert_eq!(t.state, TournamentState::Finished);
}

#[test]
fn finishing_needs_earlier_rounds_confirmed_too() {
    let mut t = tournament_with_players(4, 2);
    let mut rng = StdRng::seed_from_u64(17);
    let first = generate_round(&mut t, &mut rng).unwrap();
    play_and_confirm_round(&mut t, &first);
    advance_round(&mut t).unwrap();

    // Reopen a round-one result for editing, then finish round two.
    set_match_confirmation(&mut t, first[0].id, false).unwrap();
    let second = generate_round(&mut t, &mut rng).unwrap();
    play_and_confirm_round(&mut t, &second);

    match advance_round(&mut t) {
        Err(TournamentError::RoundIncomplete { round, pending }) => {
            assert_eq!(round, 2);
            assert_eq!(pending, vec![first[0].label()]);
        }
        other => panic!("expected RoundIncomplete, got {other:?}"),
    }
    assert_eq!(t.state, TournamentState::InProgress);

    set_match_confirmation(&mut t, first[0].id, true).unwrap();
    advance_round(&mut t).unwrap();
    assert_eq!(t.state, TournamentState::Finished);
}

#[test]
fn regenerate_is_refused_until_cleared() {
    let mut t = tournament_with_players(4, 3);
    let mut rng = StdRng::seed_from_u64(3);
    generate_round(&mut t, &mut rng).unwrap();
    assert!(generate_round(&mut t, &mut rng).is_err());
    assert_eq!(clear_round(&mut t).unwrap(), 2);
    assert_eq!(generate_round(&mut t, &mut rng).unwrap().len(), 2);
}

#[test]
fn clear_refused_after_results() {
    let mut t = tournament_with_players(4, 3);
    let mut rng = StdRng::seed_from_u64(3);
    let m = generate_round(&mut t, &mut rng).unwrap().remove(0);
    play(&mut t, &m, 4);
    assert!(matches!(clear_round(&mut t), Err(TournamentError::State { .. })));
    assert_eq!(t.matches.len(), 2);
}

#[test]
fn pending_tournament_cannot_pair() {
    let mut t = Tournament::new("Open", 3).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    assert!(matches!(open_round(&t), Err(TournamentError::State { .. })));
    assert!(generate_round(&mut t, &mut rng).is_err());
}

#[test]
fn advance_without_pairings_is_incomplete() {
    let mut t = tournament_with_players(4, 3);
    assert!(matches!(
        advance_round(&mut t),
        Err(TournamentError::RoundIncomplete { round: 1, .. })
    ));
}

#[test]
fn unknown_match_is_not_found() {
    let mut t = tournament_with_players(4, 3);
    let err = set_match_confirmation(&mut t, Uuid::new_v4(), true).unwrap_err();
    assert!(matches!(err, TournamentError::NotFound { kind: "match", .. }));
}
