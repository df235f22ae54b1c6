//! Roster CSV import and standings CSV export.

use uuid::Uuid;
use wargame_tournament::{import_roster, standings_csv, StandingsEntry, Tournament};

fn team_tournament() -> Tournament {
    Tournament::new_team("Teams", 3, vec!["Early".into(), "Late".into()]).unwrap()
}

#[test]
fn imports_individuals() {
    let mut t = Tournament::new("Open", 3).unwrap();
    let csv = "name,settled\nAlice,true\nBob,false\n";
    assert_eq!(import_roster(&mut t, csv.as_bytes()).unwrap(), 2);
    assert!(t.participants[0].settled);
    assert!(!t.participants[1].settled);
}

#[test]
fn imports_teams_with_captain() {
    let mut t = team_tournament();
    let csv = "name,era,team,captain,settled\n\
               A,Early,Red,,true\n\
               B,Late,Red,true,true\n\
               C,Early,Blue,,true\n\
               D,Late,blue,,true\n";
    import_roster(&mut t, csv.as_bytes()).unwrap();
    assert_eq!(t.teams.len(), 2);
    let red = &t.teams[0];
    assert_eq!(red.members.len(), 2);
    assert_eq!(red.captain, Some(t.participants[1].id));
    assert_eq!(t.teams[1].captain, Some(t.participants[2].id));
}

#[test]
fn bad_roster_imports_nothing() {
    let mut t = team_tournament();
    let csv = "name,era,team\nA,Early,Red\nB,Early,Red\n";
    assert!(import_roster(&mut t, csv.as_bytes()).is_err());
    assert!(t.participants.is_empty());
    assert!(t.teams.is_empty());
}

#[test]
fn standings_export_has_header() {
    let mut e = StandingsEntry::new(Uuid::new_v4(), "Alice");
    e.rank = 1;
    e.tournament_points = 10.5;
    let out = standings_csv(&[e]).unwrap();
    let mut lines = out.lines();
    assert_eq!(
        lines.next().unwrap(),
        "rank,name,matches_played,tournament_points,margin,primary,objectives,byes"
    );
    assert_eq!(lines.next().unwrap(), "1,Alice,0,10.5,0,0,0,0");
}
