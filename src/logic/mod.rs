//! Tournament business logic: scoring, standings, pairing, match lifecycle, rounds.

mod lifecycle;
mod pairing;
mod roster;
mod rounds;
mod scoring;
mod setup;
mod standings;

pub use lifecycle::{bye_result, confirm, open_bye, set_confirmation, submit_result, unconfirm};
pub use pairing::{
    generate_first_round, generate_swiss_round, individual_matches, team_matches, Entrant,
    MatchHistory, Pairing, Seeding,
};
pub use roster::{import_roster, standings_csv};
pub use rounds::{
    advance_round, clear_round, generate_round, open_round, set_match_confirmation,
    submit_match_result,
};
pub use scoring::{NearTie, ScoreBand, ScoreTable, ScoringMode};
pub use setup::start_tournament;
pub use standings::{
    compare_entries, individual_standings, standings, team_standings, EntrantId, StandingsEntry,
    TieBreak,
};
