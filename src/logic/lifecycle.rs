//! Match lifecycle: unplayed -> submitted -> confirmed, and back to submitted on undo.
//!
//! Every transition takes a match by reference and returns the next version of it, so
//! a failed transition leaves the caller's match untouched.

use crate::config::ScoringRules;
use crate::error::TournamentError;
use crate::models::{Match, MatchResult, MatchState, ParticipantId, RawScores, SideScore};
use chrono::Utc;

/// Fixed result for a bye: the present side gets the bye score, the empty side nothing.
pub fn bye_result(rules: &ScoringRules) -> MatchResult {
    MatchResult {
        scores: RawScores::new(SideScore::new(0, rules.bye.margin), SideScore::default()),
        points_a: rules.bye.points,
        points_b: 0.0,
        first_mover: None,
        submitted_at: Utc::now(),
    }
}

/// A new bye starts out submitted; it still needs confirmation to count.
pub fn open_bye(m: Match, rules: &ScoringRules) -> Match {
    if !m.is_bye() {
        return m;
    }
    Match {
        state: MatchState::Submitted(bye_result(rules)),
        ..m
    }
}

/// Record raw scores and derive tournament points. The match ends up submitted
/// (unconfirmed); resubmitting an unconfirmed match replaces its result.
pub fn submit_result(
    m: &Match,
    scores: RawScores,
    first_mover: Option<ParticipantId>,
    rules: &ScoringRules,
) -> Result<Match, TournamentError> {
    if m.is_confirmed() {
        return Err(TournamentError::state(format!(
            "{} is confirmed; unconfirm it before editing",
            m.label()
        )));
    }
    if m.is_bye() {
        return Ok(Match {
            state: MatchState::Submitted(bye_result(rules)),
            ..m.clone()
        });
    }

    let mut details = Vec::new();
    if scores.a.is_zero() && scores.b.is_zero() {
        details.push("at least one side needs a non-zero score".to_string());
    }
    let first_side = match first_mover {
        None => {
            details.push("first mover is required".to_string());
            None
        }
        Some(id) => {
            let side = m.side_of(id);
            if side.is_none() {
                details.push(format!("first mover {id} is not playing at {}", m.label()));
            }
            side
        }
    };
    let Some(first_side) = first_side.filter(|_| details.is_empty()) else {
        return Err(TournamentError::Validation { details });
    };

    let (points_a, points_b) = rules.table.score(rules.mode, &scores, first_side)?;
    Ok(Match {
        state: MatchState::Submitted(MatchResult {
            scores,
            points_a,
            points_b,
            first_mover: Some(first_side),
            submitted_at: Utc::now(),
        }),
        ..m.clone()
    })
}

/// Organizer confirmation: from here the result counts towards standings.
pub fn confirm(m: &Match) -> Result<Match, TournamentError> {
    match &m.state {
        MatchState::Unplayed => Err(TournamentError::state(format!(
            "{} has no result to confirm",
            m.label()
        ))),
        MatchState::Confirmed(_) => Err(TournamentError::state(format!(
            "{} is already confirmed",
            m.label()
        ))),
        MatchState::Submitted(result) => Ok(Match {
            state: MatchState::Confirmed(result.clone()),
            ..m.clone()
        }),
    }
}

/// Organizer undo: the result stays, but no longer counts.
pub fn unconfirm(m: &Match) -> Result<Match, TournamentError> {
    match &m.state {
        MatchState::Confirmed(result) => Ok(Match {
            state: MatchState::Submitted(result.clone()),
            ..m.clone()
        }),
        _ => Err(TournamentError::state(format!(
            "{} is not confirmed",
            m.label()
        ))),
    }
}

pub fn set_confirmation(m: &Match, confirmed: bool) -> Result<Match, TournamentError> {
    if confirmed {
        confirm(m)
    } else {
        unconfirm(m)
    }
}
