//! Per-match batting and bowling performances.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::{require_at_least, require_not_blank, ValidationError};
use super::{BattingId, BowlingId, PlayerId};

/// Runs needed in a single innings for a century.
pub const CENTURY_RUNS: u32 = 100;

/// Wickets needed in a single performance for a five-wicket haul.
pub const FIVE_WICKET_HAUL: u32 = 5;

/// Upper bound on overs in one spell.
pub const MAX_OVERS: f64 = 200.0;

pub fn is_century(runs: u32) -> bool {
    runs >= CENTURY_RUNS
}

pub fn is_five_wicket_haul(wickets_taken: u32) -> bool {
    wickets_taken >= FIVE_WICKET_HAUL
}

/// One batting innings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattingPerformance {
    pub id: BattingId,
    pub player_id: PlayerId,
    pub runs: u32,
    /// Always at least 1
    pub balls_faced: u32,
    pub sixes: u32,
    pub fours: u32,
    /// Opposing team
    pub opponent: String,
    pub match_date: NaiveDate,
}

/// One bowling spell in a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlingPerformance {
    pub id: BowlingId,
    pub player_id: PlayerId,
    /// Overs bowled, fractional values accepted as entered
    pub overs: f64,
    pub maidens: u32,
    pub runs_conceded: u32,
    pub wickets_taken: u32,
    pub opponent: String,
    pub match_date: NaiveDate,
}

/// Create/update payload for a batting innings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattingRequest {
    pub player_id: PlayerId,
    pub runs: i64,
    pub balls_faced: i64,
    pub sixes: i64,
    pub fours: i64,
    pub opponent: String,
    pub match_date: NaiveDate,
}

impl BattingRequest {
    /// Validate and build the stored record.
    pub fn into_performance(self, id: BattingId) -> Result<BattingPerformance, ValidationError> {
        let runs = require_at_least(self.runs, 0, "Runs cannot be negative")?;
        let balls_faced = require_at_least(self.balls_faced, 1, "At least 1 ball must be played")?;
        let sixes = require_at_least(self.sixes, 0, "Sixes cannot be negative")?;
        let fours = require_at_least(self.fours, 0, "Fours cannot be negative")?;
        require_not_blank(&self.opponent, "Opponent team is required")?;

        Ok(BattingPerformance {
            id,
            player_id: self.player_id,
            runs,
            balls_faced,
            sixes,
            fours,
            opponent: self.opponent,
            match_date: self.match_date,
        })
    }
}

/// Create/update payload for a bowling spell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlingRequest {
    pub player_id: PlayerId,
    pub overs: f64,
    pub maidens: i64,
    pub runs_conceded: i64,
    pub wickets_taken: i64,
    pub opponent: String,
    pub match_date: NaiveDate,
}

impl BowlingRequest {
    /// Validate and build the stored record.
    pub fn into_performance(self, id: BowlingId) -> Result<BowlingPerformance, ValidationError> {
        if !self.overs.is_finite() || self.overs < 0.0 {
            return Err(ValidationError::new("Overs cannot be negative"));
        }
        if self.overs > MAX_OVERS {
            return Err(ValidationError::new(format!("Overs cannot exceed {}", MAX_OVERS)));
        }
        let maidens = require_at_least(self.maidens, 0, "Maidens cannot be negative")?;
        let runs_conceded =
            require_at_least(self.runs_conceded, 0, "Runs given cannot be negative")?;
        let wickets_taken =
            require_at_least(self.wickets_taken, 0, "Wickets taken cannot be negative")?;
        require_not_blank(&self.opponent, "Opponent team is required")?;

        Ok(BowlingPerformance {
            id,
            player_id: self.player_id,
            overs: self.overs,
            maidens,
            runs_conceded,
            wickets_taken,
            opponent: self.opponent,
            match_date: self.match_date,
        })
    }
}
