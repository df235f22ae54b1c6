//! Wargame tournament organizer: library with models, pairing, scoring and standings.

pub mod config;
pub mod error;
pub mod logic;
pub mod models;

pub use config::{ByeScore, ScoringRules, ServerConfig};
pub use error::{ConfigError, ErrorKind, TournamentError};
pub use logic::{
    advance_round, clear_round, generate_first_round, generate_round, generate_swiss_round,
    import_roster, open_round, set_match_confirmation, standings, standings_csv, start_tournament,
    submit_match_result, MatchHistory, Pairing, ScoreBand, ScoreTable, ScoringMode, Seeding,
    StandingsEntry, TieBreak,
};
pub use models::{
    Match, MatchId, MatchResult, MatchState, Participant, ParticipantId, RawScores, Side,
    SideScore, Team, TeamId, TeamPairing, Tournament, TournamentFormat, TournamentId,
    TournamentState,
};
