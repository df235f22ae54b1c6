//! Standings: a pure fold of confirmed matches into ranked per-entrant totals.

use crate::models::{Match, MatchResult, Participant, Side, Team, Tournament};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// A participant id (individual format) or team id (team format).
pub type EntrantId = Uuid;

/// Secondary metric used to order entrants level on tournament points.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Sum of the entrant's own margin values.
    Margin,
    /// Number of special objectives achieved.
    Objectives,
    /// Sum of the entrant's primary result values.
    Primary,
}

/// One row of the standings table. Never stored authoritatively.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub entrant: EntrantId,
    pub name: String,
    /// 1-based; entrants level on every key share a rank.
    pub rank: u32,
    pub matches_played: u32,
    pub tournament_points: f64,
    pub margin_total: i64,
    pub primary_total: i64,
    pub objectives: u32,
    pub byes: u32,
}

impl StandingsEntry {
    pub fn new(entrant: EntrantId, name: impl Into<String>) -> Self {
        Self {
            entrant,
            name: name.into(),
            rank: 0,
            matches_played: 0,
            tournament_points: 0.0,
            margin_total: 0,
            primary_total: 0,
            objectives: 0,
            byes: 0,
        }
    }

    fn add_result(&mut self, result: &MatchResult, side: Side) {
        let score = result.scores.side(side);
        self.tournament_points += result.points(side);
        self.margin_total = self.margin_total.saturating_add(score.margin);
        self.primary_total = self.primary_total.saturating_add(i64::from(score.primary));
        self.objectives += score.objectives_achieved();
    }

    pub fn tie_break_value(&self, tie_break: TieBreak) -> i64 {
        match tie_break {
            TieBreak::Margin => self.margin_total,
            TieBreak::Objectives => self.objectives as i64,
            TieBreak::Primary => self.primary_total,
        }
    }
}

/// Orders by points, then each tie-break in declared order; all descending.
pub fn compare_entries(
    a: &StandingsEntry,
    b: &StandingsEntry,
    tie_breaks: &[TieBreak],
) -> Ordering {
    b.tournament_points
        .total_cmp(&a.tournament_points)
        .then_with(|| {
            tie_breaks
                .iter()
                .map(|tb| b.tie_break_value(*tb).cmp(&a.tie_break_value(*tb)))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        })
}

/// Sort and assign competition ranks (1, 1, 3). Full ties are listed by name then id.
fn rank(mut entries: Vec<StandingsEntry>, tie_breaks: &[TieBreak]) -> Vec<StandingsEntry> {
    entries.sort_by(|a, b| {
        compare_entries(a, b, tie_breaks)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.entrant.cmp(&b.entrant))
    });
    for i in 0..entries.len() {
        let rank = if i > 0 && compare_entries(&entries[i - 1], &entries[i], tie_breaks).is_eq() {
            entries[i - 1].rank
        } else {
            i as u32 + 1
        };
        entries[i].rank = rank;
    }
    entries
}

/// Per-participant standings from confirmed matches only.
pub fn individual_standings(
    participants: &[Participant],
    matches: &[Match],
    tie_breaks: &[TieBreak],
) -> Vec<StandingsEntry> {
    let mut entries: Vec<StandingsEntry> = participants
        .iter()
        .map(|p| StandingsEntry::new(p.id, p.name.clone()))
        .collect();
    let index: HashMap<EntrantId, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.entrant, i))
        .collect();

    for m in matches {
        let Some(result) = m.confirmed_result() else {
            continue;
        };
        for side in [Side::A, Side::B] {
            let Some(&i) = m.participant(side).and_then(|id| index.get(&id)) else {
                continue;
            };
            let entry = &mut entries[i];
            entry.matches_played += 1;
            if m.is_bye() {
                entry.byes += 1;
            }
            entry.add_result(result, side);
        }
    }
    rank(entries, tie_breaks)
}

/// Per-team standings: every member sub-match counts towards the team's totals,
/// and each round the team took part in counts as one match played.
pub fn team_standings(
    teams: &[Team],
    matches: &[Match],
    tie_breaks: &[TieBreak],
) -> Vec<StandingsEntry> {
    let mut entries: Vec<StandingsEntry> = teams
        .iter()
        .map(|t| StandingsEntry::new(t.id, t.name.clone()))
        .collect();
    let index: HashMap<EntrantId, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.entrant, i))
        .collect();
    let mut rounds_played: HashSet<(EntrantId, u32)> = HashSet::new();

    for m in matches {
        let Some(result) = m.confirmed_result() else {
            continue;
        };
        let Some(pairing) = m.team_pairing.as_ref() else {
            continue;
        };
        for (side, team) in [(Side::A, Some(pairing.team_a)), (Side::B, pairing.team_b)] {
            let Some(team) = team else {
                continue;
            };
            let Some(&i) = index.get(&team) else {
                continue;
            };
            let entry = &mut entries[i];
            if rounds_played.insert((team, m.round)) {
                entry.matches_played += 1;
                if pairing.team_b.is_none() {
                    entry.byes += 1;
                }
            }
            entry.add_result(result, side);
        }
    }
    rank(entries, tie_breaks)
}

/// Standings for the tournament's format under its tie-break rules.
pub fn standings(tournament: &Tournament) -> Vec<StandingsEntry> {
    let tie_breaks = &tournament.rules.tie_breaks;
    if tournament.is_team_format() {
        team_standings(&tournament.teams, &tournament.matches, tie_breaks)
    } else {
        individual_standings(&tournament.participants, &tournament.matches, tie_breaks)
    }
}
