//! Pairing generation: first-round seeding, Swiss rounds, and team slot expansion.
//!
//! Pairing works on abstract entrants (participants or teams); the controller turns
//! the resulting [`Pairing`]s into [`Match`] skeletons for the tournament's format.

use crate::error::TournamentError;
use crate::logic::standings::{EntrantId, StandingsEntry};
use crate::models::{Match, Participant, Team, TeamPairing, Tournament};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Upper bound on search nodes before a Swiss round gives up on avoiding rematches.
const SEARCH_BUDGET: usize = 100_000;

/// Anything that can be paired: an id, its score tier, and a secondary metric.
pub trait Entrant {
    fn entrant_id(&self) -> EntrantId;

    fn tournament_points(&self) -> f64 {
        0.0
    }

    fn secondary_metric(&self) -> i64 {
        0
    }
}

impl Entrant for StandingsEntry {
    fn entrant_id(&self) -> EntrantId {
        self.entrant
    }

    fn tournament_points(&self) -> f64 {
        self.tournament_points
    }

    fn secondary_metric(&self) -> i64 {
        self.margin_total
    }
}

impl Entrant for Participant {
    fn entrant_id(&self) -> EntrantId {
        self.id
    }
}

impl Entrant for Team {
    fn entrant_id(&self) -> EntrantId {
        self.id
    }
}

/// How the first round is ordered before sequential pairing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seeding {
    #[default]
    Random,
    /// Keep the order entrants were given in (registration order or an explicit seed list).
    AsGiven,
}

/// Two entrants at one table; `b == None` is a bye.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub table: u32,
    pub a: EntrantId,
    pub b: Option<EntrantId>,
}

impl Pairing {
    pub fn is_bye(&self) -> bool {
        self.b.is_none()
    }
}

/// Who has played whom, and who has had a bye, in earlier rounds.
#[derive(Clone, Debug, Default)]
pub struct MatchHistory {
    played: HashSet<(EntrantId, EntrantId)>,
    byes: HashSet<EntrantId>,
}

fn pair_key(a: EntrantId, b: EntrantId) -> (EntrantId, EntrantId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl MatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, a: EntrantId, b: Option<EntrantId>) {
        match b {
            Some(b) => {
                self.played.insert(pair_key(a, b));
            }
            None => {
                self.byes.insert(a);
            }
        }
    }

    pub fn have_played(&self, a: EntrantId, b: EntrantId) -> bool {
        self.played.contains(&pair_key(a, b))
    }

    pub fn had_bye(&self, id: EntrantId) -> bool {
        self.byes.contains(&id)
    }

    /// Participant-level history of rounds before `round`.
    pub fn from_matches(matches: &[Match], round: u32) -> Self {
        let mut history = Self::new();
        for m in matches.iter().filter(|m| m.round < round) {
            history.record(m.side_a, m.side_b);
        }
        history
    }

    /// Team-level history of rounds before `round`, read from sub-match team pairings.
    pub fn from_team_matches(matches: &[Match], round: u32) -> Self {
        let mut history = Self::new();
        for m in matches.iter().filter(|m| m.round < round) {
            if let Some(p) = &m.team_pairing {
                history.record(p.team_a, p.team_b);
            }
        }
        history
    }
}

fn number_tables(pairs: Vec<(EntrantId, EntrantId)>, bye: Option<EntrantId>) -> Vec<Pairing> {
    pairs
        .into_iter()
        .map(|(a, b)| (a, Some(b)))
        .chain(bye.map(|a| (a, None)))
        .enumerate()
        .map(|(i, (a, b))| Pairing {
            table: i as u32 + 1,
            a,
            b,
        })
        .collect()
}

/// Pair the first round: shuffle (or keep the given order), then pair sequentially.
/// With an odd count the last entrant gets the bye.
pub fn generate_first_round<E: Entrant, R: Rng + ?Sized>(
    entrants: &[E],
    seeding: Seeding,
    rng: &mut R,
) -> Result<Vec<Pairing>, TournamentError> {
    if entrants.len() < 2 {
        return Err(TournamentError::pairing(format!(
            "need at least 2 entrants, have {}",
            entrants.len()
        )));
    }
    let mut ids: Vec<EntrantId> = entrants.iter().map(|e| e.entrant_id()).collect();
    if seeding == Seeding::Random {
        ids.shuffle(rng);
    }
    let bye = if ids.len() % 2 == 1 { ids.pop() } else { None };
    let pairs = ids.chunks_exact(2).map(|c| (c[0], c[1])).collect();
    Ok(number_tables(pairs, bye))
}

/// Pair a Swiss round from standings (best first).
///
/// Entrants are grouped by tournament points; within a group the closest secondary
/// metric is preferred, and the lowest-ranked member of an odd group drops into the
/// next one. Rematches are
/// avoided whenever any complete pairing without one exists. With an odd count the
/// lowest-standing entrant without a previous bye sits out.
pub fn generate_swiss_round<E: Entrant>(
    standings: &[E],
    history: &MatchHistory,
) -> Result<Vec<Pairing>, TournamentError> {
    if standings.len() < 2 {
        return Err(TournamentError::pairing(format!(
            "need at least 2 entrants, have {}",
            standings.len()
        )));
    }
    let mut order: Vec<&E> = standings.iter().collect();
    order.sort_by(|a, b| b.tournament_points().total_cmp(&a.tournament_points()));

    let bye_candidates: Vec<usize> = if order.len() % 2 == 1 {
        let (fresh, repeat): (Vec<usize>, Vec<usize>) = (0..order.len())
            .rev()
            .partition(|&i| !history.had_bye(order[i].entrant_id()));
        fresh.into_iter().chain(repeat).collect()
    } else {
        Vec::new()
    };

    let mut budget = SEARCH_BUDGET;
    let attempts: Vec<Option<usize>> = if bye_candidates.is_empty() {
        vec![None]
    } else {
        bye_candidates.iter().copied().map(Some).collect()
    };
    for bye in &attempts {
        let pool: Vec<usize> = (0..order.len()).filter(|i| Some(*i) != *bye).collect();
        if let Some(pairs) = solve(&order, &pool, history, false, &mut budget) {
            log::debug!("Swiss round paired without rematches ({} tables)", pairs.len());
            return Ok(to_pairings(&order, pairs, *bye));
        }
        if budget == 0 {
            break;
        }
    }

    let bye = attempts[0];
    let pool: Vec<usize> = (0..order.len()).filter(|i| Some(*i) != bye).collect();
    let mut unlimited = usize::MAX;
    let pairs = solve(&order, &pool, history, true, &mut unlimited)
        .ok_or_else(|| TournamentError::pairing("no pairing exists for the remaining entrants"))?;
    let rematches = pairs
        .iter()
        .filter(|(a, b)| history.have_played(order[*a].entrant_id(), order[*b].entrant_id()))
        .count();
    log::warn!("Swiss round needs {} rematch(es); no rematch-free pairing exists", rematches);
    Ok(to_pairings(&order, pairs, bye))
}

fn to_pairings<E: Entrant>(
    order: &[&E],
    pairs: Vec<(usize, usize)>,
    bye: Option<usize>,
) -> Vec<Pairing> {
    number_tables(
        pairs
            .into_iter()
            .map(|(a, b)| (order[a].entrant_id(), order[b].entrant_id()))
            .collect(),
        bye.map(|i| order[i].entrant_id()),
    )
}

/// Candidate opponents for `top`: same tier by smallest secondary gap, then lower tiers
/// in standings order. In an odd tier the lowest-ranked member is kept for the
/// carry-down and only offered after the rest of the tier. When rematches are allowed,
/// fresh opponents still come first.
fn candidates<E: Entrant>(
    order: &[&E],
    top: usize,
    rest: &[usize],
    history: &MatchHistory,
    allow_rematch: bool,
) -> Vec<usize> {
    let points = order[top].tournament_points();
    let (mut same, lower): (Vec<usize>, Vec<usize>) = rest
        .iter()
        .copied()
        .partition(|&i| order[i].tournament_points().total_cmp(&points).is_eq());
    // `same` excludes `top`, so an even count means an odd tier.
    let carried = if same.len() % 2 == 0 { same.pop() } else { None };
    let secondary = order[top].secondary_metric();
    same.sort_by_key(|&i| order[i].secondary_metric().abs_diff(secondary));

    let all = same.into_iter().chain(carried).chain(lower);
    let id = order[top].entrant_id();
    if allow_rematch {
        let (fresh, repeat): (Vec<usize>, Vec<usize>) =
            all.partition(|&i| !history.have_played(id, order[i].entrant_id()));
        fresh.into_iter().chain(repeat).collect()
    } else {
        all.filter(|&i| !history.have_played(id, order[i].entrant_id()))
            .collect()
    }
}

/// Depth-first search pairing the highest unpaired entrant first.
fn solve<E: Entrant>(
    order: &[&E],
    unpaired: &[usize],
    history: &MatchHistory,
    allow_rematch: bool,
    budget: &mut usize,
) -> Option<Vec<(usize, usize)>> {
    let Some((&top, rest)) = unpaired.split_first() else {
        return Some(Vec::new());
    };
    if *budget == 0 {
        return None;
    }
    *budget -= 1;

    for opponent in candidates(order, top, rest, history, allow_rematch) {
        let remaining: Vec<usize> = rest.iter().copied().filter(|&i| i != opponent).collect();
        if let Some(mut pairs) = solve(order, &remaining, history, allow_rematch, budget) {
            pairs.insert(0, (top, opponent));
            return Some(pairs);
        }
        if *budget == 0 {
            return None;
        }
    }
    None
}

/// One match per pairing, individual format.
pub fn individual_matches(pairings: &[Pairing], round: u32) -> Vec<Match> {
    pairings
        .iter()
        .map(|p| Match::new(round, p.table, p.a, p.b))
        .collect()
}

/// Expand team pairings into one sub-match per era slot, pairing members holding the
/// same era tag. A team bye becomes a bye for each member.
pub fn team_matches(
    tournament: &Tournament,
    pairings: &[Pairing],
    round: u32,
) -> Result<Vec<Match>, TournamentError> {
    let member_for = |team_id: EntrantId, era: &str| -> Result<_, TournamentError> {
        let team = tournament.team(team_id).ok_or(TournamentError::NotFound {
            kind: "team",
            id: team_id,
        })?;
        team.members
            .iter()
            .copied()
            .find(|id| {
                tournament
                    .participant(*id)
                    .is_some_and(|p| p.era.as_deref() == Some(era))
            })
            .ok_or_else(|| {
                TournamentError::validation(format!("team {} has no {era} player", team.name))
            })
    };

    let mut matches = Vec::with_capacity(pairings.len() * tournament.eras.len());
    let mut table = 1;
    for pairing in pairings {
        for era in &tournament.eras {
            let a = member_for(pairing.a, era)?;
            let b = pairing.b.map(|team| member_for(team, era)).transpose()?;
            matches.push(Match::new(round, table, a, b).with_team_pairing(TeamPairing {
                team_a: pairing.a,
                team_b: pairing.b,
                era: era.clone(),
                team_table: pairing.table,
            }));
            table += 1;
        }
    }
    Ok(matches)
}
