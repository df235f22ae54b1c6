//! Data structures for the tournament: participants, teams, matches, tournament state.

mod game;
mod participant;
mod tournament;

pub use game::{Match, MatchId, MatchResult, MatchState, RawScores, Side, SideScore, TeamPairing};
pub use participant::{Participant, ParticipantId, Team, TeamId};
pub use tournament::{Tournament, TournamentFormat, TournamentId, TournamentState};
