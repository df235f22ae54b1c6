//! Setup phase: start tournament (transition from Pending to InProgress).

use crate::error::TournamentError;
use crate::models::{Tournament, TournamentState};

/// Start the tournament.
///
/// Requires at least two entrants, every team complete (one member per era plus a
/// captain), every team-format participant on a team, and every registration settled.
/// All unmet entrants are reported together.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Pending {
        return Err(TournamentError::state("tournament has already started"));
    }

    let mut details = Vec::new();
    match tournament.team_size() {
        None => {
            if tournament.participants.len() < 2 {
                details.push(format!(
                    "need at least 2 participants, have {}",
                    tournament.participants.len()
                ));
            }
        }
        Some(team_size) => {
            if tournament.teams.len() < 2 {
                details.push(format!("need at least 2 teams, have {}", tournament.teams.len()));
            }
            for team in &tournament.teams {
                if team.members.len() != team_size {
                    details.push(format!(
                        "team {} has {} of {team_size} members",
                        team.name,
                        team.members.len()
                    ));
                }
                if team.captain.map_or(true, |c| !team.has_member(c)) {
                    details.push(format!("team {} has no captain", team.name));
                }
            }
            for p in tournament.participants.iter().filter(|p| p.team.is_none()) {
                details.push(format!("{} is not on a team", p.name));
            }
        }
    }
    for p in tournament.participants.iter().filter(|p| !p.settled) {
        details.push(format!("{} has not settled registration", p.name));
    }
    if !details.is_empty() {
        return Err(TournamentError::Precondition { details });
    }

    tournament.state = TournamentState::InProgress;
    tournament.current_round = 1;
    log::info!(
        "Tournament {} started with {} participant(s), {} round(s)",
        tournament.name,
        tournament.participants.len(),
        tournament.max_rounds
    );
    Ok(())
}
