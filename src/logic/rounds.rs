//! Round control: open, pair, clear and advance rounds, and apply match transitions
//! to the tournament.
//!
//! Each operation validates everything before touching the tournament, so an error
//! leaves it exactly as it was.

use crate::error::TournamentError;
use crate::logic::lifecycle;
use crate::logic::pairing::{
    generate_first_round, generate_swiss_round, individual_matches, team_matches, MatchHistory,
};
use crate::logic::standings::{individual_standings, team_standings};
use crate::models::{Match, MatchId, ParticipantId, RawScores, Tournament, TournamentState};
use rand::Rng;

fn require_in_progress(tournament: &Tournament) -> Result<(), TournamentError> {
    match tournament.state {
        TournamentState::InProgress => Ok(()),
        TournamentState::Pending => Err(TournamentError::state("tournament has not started")),
        TournamentState::Finished => Err(TournamentError::state("tournament is finished")),
    }
}

/// The round that may be paired now. Refuses while the current round has matches
/// that are not confirmed.
pub fn open_round(tournament: &Tournament) -> Result<u32, TournamentError> {
    require_in_progress(tournament)?;
    let round = tournament.current_round;
    if round == 0 || round > tournament.max_rounds {
        return Err(TournamentError::state(format!(
            "round {round} is outside 1..={}",
            tournament.max_rounds
        )));
    }
    let unresolved: Vec<String> = tournament
        .matches_in_round(round)
        .filter(|m| !m.is_confirmed())
        .map(|m| m.label())
        .collect();
    if !unresolved.is_empty() {
        return Err(TournamentError::State { details: unresolved });
    }
    Ok(round)
}

/// Pair the current round: seeded first round for round 1, Swiss afterwards; team
/// tournaments pair teams and expand into era sub-matches. Byes are created already
/// submitted. Refuses if the round already has pairings.
pub fn generate_round<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
) -> Result<Vec<Match>, TournamentError> {
    let round = open_round(tournament)?;
    if tournament.matches_in_round(round).next().is_some() {
        return Err(TournamentError::state(format!(
            "round {round} already has pairings; clear them first"
        )));
    }

    let seeding = tournament.rules.seeding;
    let tie_breaks = &tournament.rules.tie_breaks;
    let matches = if tournament.is_team_format() {
        let pairings = if round == 1 {
            generate_first_round(&tournament.teams, seeding, rng)?
        } else {
            let table = team_standings(&tournament.teams, &tournament.matches, tie_breaks);
            let history = MatchHistory::from_team_matches(&tournament.matches, round);
            generate_swiss_round(&table, &history)?
        };
        team_matches(tournament, &pairings, round)?
    } else {
        let pairings = if round == 1 {
            generate_first_round(&tournament.participants, seeding, rng)?
        } else {
            let table =
                individual_standings(&tournament.participants, &tournament.matches, tie_breaks);
            let history = MatchHistory::from_matches(&tournament.matches, round);
            generate_swiss_round(&table, &history)?
        };
        individual_matches(&pairings, round)
    };

    let matches: Vec<Match> = matches
        .into_iter()
        .map(|m| lifecycle::open_bye(m, &tournament.rules))
        .collect();
    log::info!(
        "Round {} of {} paired: {} match(es), {} bye(s)",
        round,
        tournament.name,
        matches.len(),
        matches.iter().filter(|m| m.is_bye()).count()
    );
    tournament.matches.extend(matches.iter().cloned());
    Ok(matches)
}

/// Remove the current round's pairings so they can be regenerated. Only allowed while
/// no result other than an automatic bye has been entered.
pub fn clear_round(tournament: &mut Tournament) -> Result<usize, TournamentError> {
    require_in_progress(tournament)?;
    let round = tournament.current_round;
    let played: Vec<String> = tournament
        .matches_in_round(round)
        .filter(|m| m.is_confirmed() || (!m.is_bye() && m.result().is_some()))
        .map(|m| m.label())
        .collect();
    if !played.is_empty() {
        return Err(TournamentError::State { details: played });
    }
    let before = tournament.matches.len();
    tournament.matches.retain(|m| m.round != round);
    let removed = before - tournament.matches.len();
    log::info!(
        "Cleared {} match(es) from round {} of {}",
        removed,
        round,
        tournament.name
    );
    Ok(removed)
}

/// Close the current round once every match so far (byes included, earlier rounds
/// too) is confirmed. After the last round the tournament is finished instead.
pub fn advance_round(tournament: &mut Tournament) -> Result<(), TournamentError> {
    require_in_progress(tournament)?;
    let round = tournament.current_round;
    if tournament.matches_in_round(round).next().is_none() {
        return Err(TournamentError::RoundIncomplete {
            round,
            pending: vec!["no pairings generated".to_string()],
        });
    }
    let pending: Vec<String> = tournament
        .matches
        .iter()
        .filter(|m| m.round <= round && !m.is_confirmed())
        .map(|m| m.label())
        .collect();
    if !pending.is_empty() {
        return Err(TournamentError::RoundIncomplete { round, pending });
    }

    if round >= tournament.max_rounds {
        tournament.state = TournamentState::Finished;
        log::info!("Tournament {} finished after round {}", tournament.name, round);
    } else {
        tournament.current_round += 1;
        log::info!(
            "Tournament {} advanced to round {}",
            tournament.name,
            tournament.current_round
        );
    }
    Ok(())
}

fn match_index(tournament: &Tournament, id: MatchId) -> Result<usize, TournamentError> {
    tournament
        .matches
        .iter()
        .position(|m| m.id == id)
        .ok_or(TournamentError::NotFound { kind: "match", id })
}

/// Submit (or re-edit) a match result.
pub fn submit_match_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    scores: RawScores,
    first_mover: Option<ParticipantId>,
) -> Result<&Match, TournamentError> {
    require_in_progress(tournament)?;
    let idx = match_index(tournament, match_id)?;
    let updated = lifecycle::submit_result(
        &tournament.matches[idx],
        scores,
        first_mover,
        &tournament.rules,
    )?;
    log::debug!("Result submitted for {}", updated.label());
    tournament.matches[idx] = updated;
    Ok(&tournament.matches[idx])
}

/// Confirm (`true`) or unconfirm (`false`) a match.
pub fn set_match_confirmation(
    tournament: &mut Tournament,
    match_id: MatchId,
    confirmed: bool,
) -> Result<&Match, TournamentError> {
    require_in_progress(tournament)?;
    let idx = match_index(tournament, match_id)?;
    let updated = lifecycle::set_confirmation(&tournament.matches[idx], confirmed)?;
    log::debug!(
        "{} {}",
        updated.label(),
        if confirmed { "confirmed" } else { "unconfirmed" }
    );
    tournament.matches[idx] = updated;
    Ok(&tournament.matches[idx])
}
