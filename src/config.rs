//! Configuration: server bind address from the environment, scoring rules from TOML.

use crate::error::{ConfigError, TournamentError};
use crate::logic::{ScoreTable, ScoringMode, Seeding, TieBreak};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fixed result awarded to the present side of a bye.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ByeScore {
    pub points: f64,
    #[serde(default)]
    pub margin: i64,
}

impl Default for ByeScore {
    fn default() -> Self {
        Self {
            points: 20.0,
            margin: 0,
        }
    }
}

/// Per-tournament scoring rules. A copy lives on each tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    #[serde(default)]
    pub table: ScoreTable,
    #[serde(default)]
    pub mode: ScoringMode,
    #[serde(default)]
    pub bye: ByeScore,
    /// Ordered tie-breaks applied after tournament points.
    #[serde(default = "default_tie_breaks")]
    pub tie_breaks: Vec<TieBreak>,
    #[serde(default)]
    pub seeding: Seeding,
}

fn default_tie_breaks() -> Vec<TieBreak> {
    vec![TieBreak::Margin, TieBreak::Objectives]
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            table: ScoreTable::default(),
            mode: ScoringMode::default(),
            bye: ByeScore::default(),
            tie_breaks: default_tie_breaks(),
            seeding: Seeding::default(),
        }
    }
}

impl ScoringRules {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let rules: Self = toml::from_str(s)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Rules from the file named by `SCORING_CONFIG`, or the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var("SCORING_CONFIG") {
            Ok(path) => {
                log::info!("Loading scoring rules from {}", path);
                Self::load(Path::new(&path))
            }
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), TournamentError> {
        self.table.validate()?;
        let top = self.table.bands.iter().map(|b| b.winner).fold(0.0, f64::max);
        if self.bye.points < top {
            log::warn!(
                "Bye awards {} points, less than the best band ({})",
                self.bye.points,
                top
            );
        }
        Ok(())
    }
}

/// Where the web shell listens. Override with env: HOST, PORT.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
        }
    }
}
