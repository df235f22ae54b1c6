//! Participant (individual registrant) and Team.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (used in matches and lookups).
pub type ParticipantId = Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// A registered player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub team: Option<TeamId>,
    /// Era/faction tag; in team format it decides which opposing member this one plays.
    pub era: Option<String>,
    /// Registration fee settled. Start is blocked while anyone is unsettled.
    pub settled: bool,
}

impl Participant {
    /// Create a new participant with the given name, no team, no era, unsettled.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            team: None,
            era: None,
            settled: false,
        }
    }

    pub fn with_era(mut self, era: impl Into<String>) -> Self {
        self.era = Some(era.into());
        self
    }

    pub fn settled(mut self) -> Self {
        self.settled = true;
        self
    }
}

/// A team of participants, ordered, with one captain.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub members: Vec<ParticipantId>,
    pub captain: Option<ParticipantId>,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            members: Vec::new(),
            captain: None,
        }
    }

    pub fn has_member(&self, id: ParticipantId) -> bool {
        self.members.contains(&id)
    }
}
