//! Score table: raw result differential -> (winner, loser) tournament points.

use crate::error::TournamentError;
use crate::models::{RawScores, Side};
use serde::{Deserialize, Serialize};

/// One band of the score table. `max == None` means unbounded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreBand {
    pub min: u64,
    #[serde(default)]
    pub max: Option<u64>,
    pub winner: f64,
    pub loser: f64,
}

impl ScoreBand {
    pub fn new(min: u64, max: Option<u64>, winner: f64, loser: f64) -> Self {
        Self {
            min,
            max,
            winner,
            loser,
        }
    }

    pub fn contains(&self, difference: u64) -> bool {
        difference >= self.min && self.max.map_or(true, |max| difference <= max)
    }
}

/// Points for an exact draw, decided by who acted first.
///
/// Which side gets the higher value is a tournament policy, not something derived
/// from the band table; both values are configurable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NearTie {
    pub first_mover: f64,
    pub second_mover: f64,
}

impl Default for NearTie {
    fn default() -> Self {
        Self {
            first_mover: 10.5,
            second_mover: 10.0,
        }
    }
}

/// Which raw value the differential is taken from.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Difference of the primary result values.
    #[default]
    Primary,
    /// "Massacre" scoring: difference of the margin values.
    Margin,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub bands: Vec<ScoreBand>,
    #[serde(default)]
    pub near_tie: NearTie,
}

impl Default for ScoreTable {
    /// 20-0 table: every three points of difference moves one tournament point.
    fn default() -> Self {
        let mut bands: Vec<ScoreBand> = (0..9)
            .map(|i| {
                let min = 1 + 3 * i as u64;
                ScoreBand::new(min, Some(min + 2), 11.0 + i as f64, 9.0 - i as f64)
            })
            .collect();
        bands.push(ScoreBand::new(28, None, 20.0, 0.0));
        Self {
            bands,
            near_tie: NearTie::default(),
        }
    }
}

impl ScoreTable {
    pub fn new(bands: Vec<ScoreBand>, near_tie: NearTie) -> Self {
        Self { bands, near_tie }
    }

    /// (winner, loser) points for a non-zero absolute difference.
    pub fn lookup(&self, difference: u64) -> Result<(f64, f64), TournamentError> {
        self.bands
            .iter()
            .find(|band| band.contains(difference))
            .map(|band| (band.winner, band.loser))
            .ok_or_else(|| {
                TournamentError::scoring(format!(
                    "no score band covers a difference of {difference}"
                ))
            })
    }

    /// Tournament points for (side A, side B).
    pub fn score(
        &self,
        mode: ScoringMode,
        scores: &RawScores,
        first_mover: Side,
    ) -> Result<(f64, f64), TournamentError> {
        let signed = match mode {
            ScoringMode::Primary => scores.a.primary as i64 - scores.b.primary as i64,
            ScoringMode::Margin => scores
                .a
                .margin
                .checked_sub(scores.b.margin)
                .ok_or_else(|| TournamentError::validation("margin difference out of range"))?,
        };
        if signed == 0 {
            let NearTie {
                first_mover: first,
                second_mover: second,
            } = self.near_tie;
            return Ok(match first_mover {
                Side::A => (first, second),
                Side::B => (second, first),
            });
        }
        let (winner, loser) = self.lookup(signed.unsigned_abs())?;
        Ok(if signed > 0 {
            (winner, loser)
        } else {
            (loser, winner)
        })
    }

    /// Checks the bands start at 1, are contiguous and end unbounded.
    pub fn validate(&self) -> Result<(), TournamentError> {
        let mut details = Vec::new();
        let mut expected = 1u64;
        let mut unbounded = false;
        for (i, band) in self.bands.iter().enumerate() {
            if unbounded {
                details.push(format!("band {i} follows the unbounded band"));
                break;
            }
            if band.min != expected {
                details.push(format!(
                    "band {i} starts at {} but {} was expected",
                    band.min, expected
                ));
            }
            if band.winner < band.loser {
                details.push(format!("band {i} awards the loser more than the winner"));
            }
            match band.max {
                Some(max) if max < band.min => {
                    details.push(format!("band {i} ends before it starts"));
                }
                Some(max) => expected = max + 1,
                None => unbounded = true,
            }
        }
        if !unbounded {
            details.push("last band must be unbounded".to_string());
        }
        if details.is_empty() {
            Ok(())
        } else {
            Err(TournamentError::Scoring { details })
        }
    }
}
