//! Registration: participants, teams, captains and tournament creation.

use wargame_tournament::{
    start_tournament, ErrorKind, Participant, Tournament, TournamentError, TournamentState,
};

fn team_tournament() -> Tournament {
    Tournament::new_team(
        "Doubles",
        3,
        vec!["Early".into(), "Mid".into(), "Late".into()],
    )
    .unwrap()
}

#[test]
fn zero_rounds_is_rejected() {
    let err = Tournament::new("Open", 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let err = Tournament::new_team("Teams", 0, vec!["Early".into()]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(Tournament::new("Open", 1).unwrap().max_rounds, 1);
}

#[test]
fn duplicate_names_are_rejected() {
    let mut t = Tournament::new("Open", 3).unwrap();
    t.add_participant(Participant::new("Alice")).unwrap();
    let err = t.add_participant(Participant::new(" alice ")).unwrap_err();
    assert!(matches!(err, TournamentError::Validation { .. }));
}

#[test]
fn remove_only_while_pending() {
    let mut t = Tournament::new("Open", 3).unwrap();
    let id = t.add_participant(Participant::new("Alice")).unwrap();
    t.state = TournamentState::InProgress;
    assert!(matches!(t.remove_participant(id), Err(TournamentError::State { .. })));
    t.state = TournamentState::Pending;
    t.remove_participant(id).unwrap();
    assert!(t.participants.is_empty());
}

#[test]
fn team_rejects_repeated_era() {
    let mut t = team_tournament();
    let a = t.add_participant(Participant::new("A").with_era("Early")).unwrap();
    let b = t.add_participant(Participant::new("B").with_era("Early")).unwrap();
    let err = t.create_team("X", &[a, b], Some(a)).unwrap_err();
    assert!(matches!(err, TournamentError::Validation { .. }));
    assert!(t.teams.is_empty());
    assert!(t.participant(a).unwrap().team.is_none());
}

#[test]
fn add_member_keeps_eras_distinct() {
    let mut t = team_tournament();
    let a = t.add_participant(Participant::new("A").with_era("Early")).unwrap();
    let b = t.add_participant(Participant::new("B").with_era("Early")).unwrap();
    let c = t.add_participant(Participant::new("C").with_era("Mid")).unwrap();
    let team = t.create_team("X", &[a], Some(a)).unwrap();
    assert!(t.add_team_member(team, b).is_err());
    t.add_team_member(team, c).unwrap();
    assert_eq!(t.team(team).unwrap().members, vec![a, c]);
    assert_eq!(t.participant(c).unwrap().team, Some(team));
}

#[test]
fn unknown_era_is_rejected_at_registration() {
    let mut t = team_tournament();
    assert!(t.add_participant(Participant::new("A").with_era("Modern")).is_err());
}

#[test]
fn removing_captain_clears_captaincy() {
    let mut t = team_tournament();
    let a = t.add_participant(Participant::new("A").with_era("Early")).unwrap();
    let team = t.create_team("X", &[a], Some(a)).unwrap();
    t.remove_participant(a).unwrap();
    let team = t.team(team).unwrap();
    assert!(team.members.is_empty());
    assert_eq!(team.captain, None);
}

#[test]
fn captain_is_fixed_once_started() {
    let mut t = Tournament::new_team("Pairs", 3, vec!["Early".into(), "Late".into()]).unwrap();
    let mut teams = Vec::new();
    for name in ["X", "Y"] {
        let early = t
            .add_participant(Participant::new(format!("{name}1")).with_era("Early").settled())
            .unwrap();
        let late = t
            .add_participant(Participant::new(format!("{name}2")).with_era("Late").settled())
            .unwrap();
        let team = t.create_team(name, &[early, late], Some(early)).unwrap();
        teams.push((team, early, late));
    }

    let (x, x_early, x_late) = teams[0];
    t.set_captain(x, x_late).unwrap();
    t.set_captain(x, x_early).unwrap();
    start_tournament(&mut t).unwrap();

    let err = t.set_captain(x, x_late).unwrap_err();
    assert!(matches!(err, TournamentError::State { .. }));
    assert_eq!(t.team(x).unwrap().captain, Some(x_early));
}

#[test]
fn scenarios_must_name_a_real_round() {
    let mut t = Tournament::new("Open", 3).unwrap();
    t.set_scenario(2, "Take and Hold").unwrap();
    assert!(t.set_scenario(0, "Nope").is_err());
    assert!(t.set_scenario(4, "Nope").is_err());
    assert_eq!(t.scenarios.get(&2).map(String::as_str), Some("Take and Hold"));
}
