//! CSV roster import and standings export.

use crate::error::TournamentError;
use crate::logic::standings::StandingsEntry;
use crate::models::{Participant, Tournament};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One roster line: `name,era,team,captain,settled`. Only `name` is required.
#[derive(Debug, Deserialize)]
struct RosterRow {
    name: String,
    #[serde(default)]
    era: Option<String>,
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    captain: Option<bool>,
    #[serde(default)]
    settled: Option<bool>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Register everyone in a roster CSV, creating teams by name as they appear. A team's
/// captain is the row marked `captain`, or its first listed member. Either the whole
/// roster is imported or nothing is.
pub fn import_roster<R: std::io::Read>(
    tournament: &mut Tournament,
    reader: R,
) -> Result<usize, TournamentError> {
    let mut draft = tournament.clone();
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut teams: Vec<(String, Vec<_>, Option<_>)> = Vec::new();
    let mut team_index: HashMap<String, usize> = HashMap::new();
    let mut count = 0;

    for (line, row) in rdr.deserialize::<RosterRow>().enumerate() {
        let row = row.map_err(|e| {
            TournamentError::validation(format!("roster line {}: {e}", line + 2))
        })?;
        let mut participant = Participant::new(row.name);
        participant.era = non_empty(row.era);
        participant.settled = row.settled.unwrap_or(false);
        let id = draft.add_participant(participant)?;
        count += 1;

        if let Some(team) = non_empty(row.team) {
            let idx = *team_index.entry(team.to_lowercase()).or_insert_with(|| {
                teams.push((team.clone(), Vec::new(), None));
                teams.len() - 1
            });
            let entry = &mut teams[idx];
            entry.1.push(id);
            if row.captain.unwrap_or(false) || entry.2.is_none() {
                entry.2 = Some(id);
            }
        }
    }

    for (name, members, captain) in teams {
        draft.create_team(name, &members, captain)?;
    }
    *tournament = draft;
    log::info!("Imported {} participant(s) into {}", count, tournament.name);
    Ok(count)
}

#[derive(Serialize)]
struct StandingsRow<'a> {
    rank: u32,
    name: &'a str,
    matches_played: u32,
    tournament_points: f64,
    margin: i64,
    primary: i64,
    objectives: u32,
    byes: u32,
}

/// Standings as CSV with a header row.
pub fn standings_csv(entries: &[StandingsEntry]) -> Result<String, TournamentError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for e in entries {
        wtr.serialize(StandingsRow {
            rank: e.rank,
            name: &e.name,
            matches_played: e.matches_played,
            tournament_points: e.tournament_points,
            margin: e.margin_total,
            primary: e.primary_total,
            objectives: e.objectives,
            byes: e.byes,
        })
        .map_err(|e| TournamentError::validation(format!("standings export: {e}")))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| TournamentError::validation(format!("standings export: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| TournamentError::validation(format!("standings export: {e}")))
}
