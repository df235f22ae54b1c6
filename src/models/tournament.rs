//! Tournament aggregate and its registration operations.

use crate::config::ScoringRules;
use crate::error::TournamentError;
use crate::models::game::{Match, MatchId};
use crate::models::participant::{Participant, ParticipantId, Team, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Individual play, or teams of `team_size` members playing one sub-match per era.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TournamentFormat {
    Individual,
    Team { team_size: usize },
}

/// Lifecycle of the tournament. Only moves forward.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// Registration open; no rounds yet.
    #[default]
    Pending,
    InProgress,
    Finished,
}

/// Full tournament state: entrants, matches, rules, and round counter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    /// Era tags, one per team slot (team format only).
    pub eras: Vec<String>,
    pub max_rounds: u32,
    /// Round currently being played; 0 until the tournament starts.
    pub current_round: u32,
    pub state: TournamentState,
    /// Scenario label per round number.
    pub scenarios: BTreeMap<u32, String>,
    pub point_budget: u32,
    pub rules: ScoringRules,
    pub participants: Vec<Participant>,
    pub teams: Vec<Team>,
    /// Every match of every round, in creation order.
    pub matches: Vec<Match>,
}

impl Tournament {
    /// Create an individual-format tournament in Pending state with no participants.
    pub fn new(name: impl Into<String>, max_rounds: u32) -> Result<Self, TournamentError> {
        if max_rounds == 0 {
            return Err(TournamentError::validation("a tournament needs at least one round"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format: TournamentFormat::Individual,
            eras: Vec::new(),
            max_rounds,
            current_round: 0,
            state: TournamentState::Pending,
            scenarios: BTreeMap::new(),
            point_budget: 0,
            rules: ScoringRules::default(),
            participants: Vec::new(),
            teams: Vec::new(),
            matches: Vec::new(),
        })
    }

    /// Create a team-format tournament; team size is the number of eras.
    pub fn new_team(
        name: impl Into<String>,
        max_rounds: u32,
        eras: Vec<String>,
    ) -> Result<Self, TournamentError> {
        let eras: Vec<String> = eras.into_iter().map(|e| e.trim().to_string()).collect();
        if eras.is_empty() || eras.iter().any(|e| e.is_empty()) {
            return Err(TournamentError::validation("team format needs non-empty era tags"));
        }
        let distinct: HashSet<&str> = eras.iter().map(|e| e.as_str()).collect();
        if distinct.len() != eras.len() {
            return Err(TournamentError::validation("era tags must be distinct"));
        }
        Ok(Self {
            format: TournamentFormat::Team {
                team_size: eras.len(),
            },
            eras,
            ..Self::new(name, max_rounds)?
        })
    }

    pub fn with_rules(mut self, rules: ScoringRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_point_budget(mut self, point_budget: u32) -> Self {
        self.point_budget = point_budget;
        self
    }

    pub fn team_size(&self) -> Option<usize> {
        match self.format {
            TournamentFormat::Individual => None,
            TournamentFormat::Team { team_size } => Some(team_size),
        }
    }

    pub fn is_team_format(&self) -> bool {
        self.team_size().is_some()
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn matches_in_round(&self, round: u32) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    /// Display name of a participant, or a placeholder for unknown ids.
    pub fn participant_name(&self, id: ParticipantId) -> &str {
        self.participant(id).map_or("<unknown>", |p| p.name.as_str())
    }

    fn require_pending(&self, action: &str) -> Result<(), TournamentError> {
        if self.state != TournamentState::Pending {
            return Err(TournamentError::state(format!(
                "cannot {action} once the tournament has started"
            )));
        }
        Ok(())
    }

    fn participant_mut(
        &mut self,
        id: ParticipantId,
    ) -> Result<&mut Participant, TournamentError> {
        self.participants
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(TournamentError::NotFound {
                kind: "participant",
                id,
            })
    }

    fn team_index(&self, id: TeamId) -> Result<usize, TournamentError> {
        self.teams
            .iter()
            .position(|t| t.id == id)
            .ok_or(TournamentError::NotFound { kind: "team", id })
    }

    /// Register a participant (Pending only). Names are unique, case-insensitive.
    pub fn add_participant(
        &mut self,
        participant: Participant,
    ) -> Result<ParticipantId, TournamentError> {
        self.require_pending("register participants")?;
        let name = participant.name.trim();
        if name.is_empty() {
            return Err(TournamentError::validation("participant name is empty"));
        }
        if self
            .participants
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name))
        {
            return Err(TournamentError::validation(format!(
                "a participant named {name} already exists"
            )));
        }
        if let Some(era) = &participant.era {
            if self.is_team_format() && !self.eras.contains(era) {
                return Err(TournamentError::validation(format!(
                    "unknown era {era} for {name}"
                )));
            }
        }
        let participant = Participant {
            name: name.to_string(),
            team: None,
            ..participant
        };
        let id = participant.id;
        self.participants.push(participant);
        Ok(id)
    }

    /// Remove a participant by id (Pending only). Also drops them from their team.
    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<(), TournamentError> {
        self.require_pending("remove participants")?;
        let idx = self
            .participants
            .iter()
            .position(|p| p.id == id)
            .ok_or(TournamentError::NotFound {
                kind: "participant",
                id,
            })?;
        let removed = self.participants.remove(idx);
        if let Some(team_id) = removed.team {
            if let Some(team) = self.teams.iter_mut().find(|t| t.id == team_id) {
                team.members.retain(|m| *m != id);
                if team.captain == Some(id) {
                    team.captain = None;
                }
            }
        }
        Ok(())
    }

    /// Mark a participant's registration as paid (or not).
    pub fn set_settled(&mut self, id: ParticipantId, settled: bool) -> Result<(), TournamentError> {
        self.participant_mut(id)?.settled = settled;
        Ok(())
    }

    /// Scenario played in a given round.
    pub fn set_scenario(
        &mut self,
        round: u32,
        label: impl Into<String>,
    ) -> Result<(), TournamentError> {
        if round == 0 || round > self.max_rounds {
            return Err(TournamentError::validation(format!(
                "round {round} is outside 1..={}",
                self.max_rounds
            )));
        }
        self.scenarios.insert(round, label.into());
        Ok(())
    }

    /// Create a team (team format, Pending only). Members may be added later, but every
    /// member must carry a distinct era tag from the tournament's era list.
    pub fn create_team(
        &mut self,
        name: impl Into<String>,
        members: &[ParticipantId],
        captain: Option<ParticipantId>,
    ) -> Result<TeamId, TournamentError> {
        self.require_pending("create teams")?;
        let team_size = self
            .team_size()
            .ok_or_else(|| TournamentError::validation("teams need a team-format tournament"))?;
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(TournamentError::validation("team name is empty"));
        }
        if self.teams.iter().any(|t| t.name.eq_ignore_ascii_case(&name)) {
            return Err(TournamentError::validation(format!(
                "a team named {name} already exists"
            )));
        }
        if members.len() > team_size {
            return Err(TournamentError::Validation {
                details: vec![format!(
                    "team {name} has {} members, team size is {team_size}",
                    members.len()
                )],
            });
        }
        self.check_members_fit(&name, &[], members)?;
        if let Some(captain) = captain {
            if !members.contains(&captain) {
                return Err(TournamentError::validation(format!(
                    "captain of {name} is not a member"
                )));
            }
        }

        let mut team = Team::new(name);
        team.members = members.to_vec();
        team.captain = captain;
        let team_id = team.id;
        for id in members {
            self.participant_mut(*id)?.team = Some(team_id);
        }
        self.teams.push(team);
        Ok(team_id)
    }

    /// Add a participant to an existing team (Pending only).
    pub fn add_team_member(
        &mut self,
        team_id: TeamId,
        member: ParticipantId,
    ) -> Result<(), TournamentError> {
        self.require_pending("change teams")?;
        let idx = self.team_index(team_id)?;
        let team_size = self.team_size().unwrap_or(0);
        let team = &self.teams[idx];
        if team.members.len() >= team_size {
            return Err(TournamentError::validation(format!(
                "team {} is already full",
                team.name
            )));
        }
        let (name, existing) = (team.name.clone(), team.members.clone());
        self.check_members_fit(&name, &existing, &[member])?;
        self.participant_mut(member)?.team = Some(team_id);
        self.teams[idx].members.push(member);
        Ok(())
    }

    /// Hand the captaincy to another member (Pending only).
    pub fn set_captain(
        &mut self,
        team_id: TeamId,
        captain: ParticipantId,
    ) -> Result<(), TournamentError> {
        self.require_pending("change captains")?;
        let idx = self.team_index(team_id)?;
        let team = &mut self.teams[idx];
        if !team.has_member(captain) {
            return Err(TournamentError::validation(format!(
                "captain of {} is not a member",
                team.name
            )));
        }
        team.captain = Some(captain);
        Ok(())
    }

    /// New members exist, are teamless, have an era from the list, and no era repeats.
    fn check_members_fit(
        &self,
        team_name: &str,
        existing: &[ParticipantId],
        new_members: &[ParticipantId],
    ) -> Result<(), TournamentError> {
        let mut details = Vec::new();
        let mut eras_taken: HashSet<&str> = existing
            .iter()
            .filter_map(|id| self.participant(*id))
            .filter_map(|p| p.era.as_deref())
            .collect();
        for id in new_members {
            let Some(p) = self.participant(*id) else {
                return Err(TournamentError::NotFound {
                    kind: "participant",
                    id: *id,
                });
            };
            if p.team.is_some() || existing.contains(id) {
                details.push(format!("{} is already in a team", p.name));
            }
            match p.era.as_deref() {
                None => details.push(format!("{} has no era", p.name)),
                Some(era) if !self.eras.iter().any(|e| e == era) => {
                    details.push(format!("{} plays unknown era {era}", p.name))
                }
                Some(era) => {
                    if !eras_taken.insert(era) {
                        details.push(format!(
                            "{team_name} already has a {era} player ({})",
                            p.name
                        ));
                    }
                }
            }
        }
        if details.is_empty() {
            Ok(())
        } else {
            Err(TournamentError::Validation { details })
        }
    }
}
