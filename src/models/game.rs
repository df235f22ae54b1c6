//! Match (one pairing at one table), its raw scores and its confirmation state.

use crate::models::participant::{ParticipantId, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One of the two sides of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Raw in-game result for one side.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SideScore {
    /// Primary result value (e.g. victory points).
    pub primary: u32,
    /// Secondary margin value (e.g. points destroyed); also the margin tie-break.
    #[serde(default)]
    pub margin: i64,
    /// Special-objective flags; each `true` counts towards the objectives tie-break.
    #[serde(default)]
    pub objectives: Vec<bool>,
}

impl SideScore {
    pub fn new(primary: u32, margin: i64) -> Self {
        Self {
            primary,
            margin,
            objectives: Vec::new(),
        }
    }

    pub fn with_objectives(mut self, objectives: Vec<bool>) -> Self {
        self.objectives = objectives;
        self
    }

    pub fn objectives_achieved(&self) -> u32 {
        self.objectives.iter().filter(|o| **o).count() as u32
    }

    pub fn is_zero(&self) -> bool {
        self.primary == 0 && self.margin == 0
    }
}

/// Raw scores as submitted for both sides.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawScores {
    pub a: SideScore,
    pub b: SideScore,
}

impl RawScores {
    pub fn new(a: SideScore, b: SideScore) -> Self {
        Self { a, b }
    }

    pub fn side(&self, side: Side) -> &SideScore {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }
}

/// A scored result: raw scores plus the derived tournament points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub scores: RawScores,
    pub points_a: f64,
    pub points_b: f64,
    /// Side that acted first. None for byes.
    pub first_mover: Option<Side>,
    pub submitted_at: DateTime<Utc>,
}

impl MatchResult {
    pub fn points(&self, side: Side) -> f64 {
        match side {
            Side::A => self.points_a,
            Side::B => self.points_b,
        }
    }
}

/// Confirmation state of a match. Only `Confirmed` results count towards standings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum MatchState {
    #[default]
    Unplayed,
    Submitted(MatchResult),
    Confirmed(MatchResult),
}

/// Team-level context of an individual sub-match (team format only).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamPairing {
    pub team_a: TeamId,
    /// None when the whole team has a bye.
    pub team_b: Option<TeamId>,
    pub era: String,
    /// Table of the team pairing this sub-match belongs to.
    pub team_table: u32,
}

/// A single match. `side_b == None` is a bye.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub round: u32,
    pub table: u32,
    pub side_a: ParticipantId,
    pub side_b: Option<ParticipantId>,
    pub team_pairing: Option<TeamPairing>,
    pub state: MatchState,
}

impl Match {
    /// An unplayed match skeleton.
    pub fn new(
        round: u32,
        table: u32,
        side_a: ParticipantId,
        side_b: Option<ParticipantId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            table,
            side_a,
            side_b,
            team_pairing: None,
            state: MatchState::Unplayed,
        }
    }

    pub fn with_team_pairing(mut self, pairing: TeamPairing) -> Self {
        self.team_pairing = Some(pairing);
        self
    }

    pub fn is_bye(&self) -> bool {
        self.side_b.is_none()
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self.state, MatchState::Confirmed(_))
    }

    /// Submitted or confirmed result, if any.
    pub fn result(&self) -> Option<&MatchResult> {
        match &self.state {
            MatchState::Unplayed => None,
            MatchState::Submitted(r) | MatchState::Confirmed(r) => Some(r),
        }
    }

    /// Result only if it counts towards standings.
    pub fn confirmed_result(&self) -> Option<&MatchResult> {
        match &self.state {
            MatchState::Confirmed(r) => Some(r),
            _ => None,
        }
    }

    pub fn participant(&self, side: Side) -> Option<ParticipantId> {
        match side {
            Side::A => Some(self.side_a),
            Side::B => self.side_b,
        }
    }

    /// Which side the participant plays on, if any.
    pub fn side_of(&self, id: ParticipantId) -> Option<Side> {
        if self.side_a == id {
            Some(Side::A)
        } else if self.side_b == Some(id) {
            Some(Side::B)
        } else {
            None
        }
    }

    /// Which side the team plays on, if this is a team sub-match.
    pub fn team_side(&self, team: TeamId) -> Option<Side> {
        let pairing = self.team_pairing.as_ref()?;
        if pairing.team_a == team {
            Some(Side::A)
        } else if pairing.team_b == Some(team) {
            Some(Side::B)
        } else {
            None
        }
    }

    /// Short label for error details and logs.
    pub fn label(&self) -> String {
        format!("round {} table {}", self.round, self.table)
    }
}
