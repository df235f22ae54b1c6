//! Error taxonomy for the engine and its configuration.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Broad error category, used by the shell to pick a user-facing response.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    State,
    Precondition,
    Scoring,
    Pairing,
    NotFound,
}

/// Errors returned by tournament operations. No operation mutates anything before
/// returning one of these.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TournamentError {
    /// Malformed or missing scores, team-size mismatch, era-slot mismatch.
    #[error("validation failed: {}", .details.join("; "))]
    Validation { details: Vec<String> },

    /// Operation is illegal in the current lifecycle state.
    #[error("invalid state: {}", .details.join("; "))]
    State { details: Vec<String> },

    /// Round cannot advance because some of its matches are not confirmed.
    #[error("round {round} is incomplete: {}", .pending.join("; "))]
    RoundIncomplete { round: u32, pending: Vec<String> },

    /// Entrants failing a start/generation precondition.
    #[error("precondition failed: {}", .details.join("; "))]
    Precondition { details: Vec<String> },

    /// No score band matched; the score table is misconfigured.
    #[error("scoring failed: {}", .details.join("; "))]
    Scoring { details: Vec<String> },

    /// Pairing impossible under the given constraints.
    #[error("pairing failed: {}", .details.join("; "))]
    Pairing { details: Vec<String> },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },
}

impl TournamentError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation {
            details: vec![detail.into()],
        }
    }

    pub fn state(detail: impl Into<String>) -> Self {
        Self::State {
            details: vec![detail.into()],
        }
    }

    pub fn precondition(detail: impl Into<String>) -> Self {
        Self::Precondition {
            details: vec![detail.into()],
        }
    }

    pub fn scoring(detail: impl Into<String>) -> Self {
        Self::Scoring {
            details: vec![detail.into()],
        }
    }

    pub fn pairing(detail: impl Into<String>) -> Self {
        Self::Pairing {
            details: vec![detail.into()],
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::State { .. } | Self::RoundIncomplete { .. } => ErrorKind::State,
            Self::Precondition { .. } => ErrorKind::Precondition,
            Self::Scoring { .. } => ErrorKind::Scoring,
            Self::Pairing { .. } => ErrorKind::Pairing,
            Self::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// Human-readable detail lines (entrant names, failing checks).
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::Validation { details }
            | Self::State { details }
            | Self::Precondition { details }
            | Self::Scoring { details }
            | Self::Pairing { details } => details.clone(),
            Self::RoundIncomplete { pending, .. } => pending.clone(),
            Self::NotFound { kind, id } => vec![format!("{kind} {id}")],
        }
    }
}

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    Invalid(#[from] TournamentError),
}
