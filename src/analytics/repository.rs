//! Read-side contract the aggregation engine consumes.
//!
//! Rows arrive already joined with the owning player's identity, so the
//! engine never needs to know how players and performances are stored.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::PlayerId;

/// The record store could not supply performance data.
#[derive(Debug, Error)]
#[error("performance data unavailable: {0}")]
pub struct RepositoryError(pub String);

/// A batting innings joined with its player.
#[derive(Debug, Clone, PartialEq)]
pub struct BattingRow {
    pub player_id: PlayerId,
    pub player_name: String,
    pub runs: u32,
    pub sixes: u32,
    pub fours: u32,
    pub match_date: NaiveDate,
}

/// A bowling spell joined with its player.
#[derive(Debug, Clone, PartialEq)]
pub struct BowlingRow {
    pub player_id: PlayerId,
    pub player_name: String,
    pub overs: f64,
    pub maidens: u32,
    pub wickets_taken: u32,
    pub runs_conceded: u32,
    pub match_date: NaiveDate,
}

/// Both disciplines read from one consistent view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceSnapshot {
    pub batting: Vec<BattingRow>,
    pub bowling: Vec<BowlingRow>,
}

#[async_trait]
pub trait PerformanceRepository: Send + Sync {
    async fn all_batting_performances(&self) -> Result<Vec<BattingRow>, RepositoryError>;

    async fn all_bowling_performances(&self) -> Result<Vec<BowlingRow>, RepositoryError>;

    /// Fetch both sequences. Implementations able to read them under a
    /// single view should override this.
    async fn snapshot(&self) -> Result<PerformanceSnapshot, RepositoryError> {
        let batting = self.all_batting_performances().await?;
        let bowling = self.all_bowling_performances().await?;
        Ok(PerformanceSnapshot { batting, bowling })
    }
}

/// A fixed snapshot serves as its own repository.
#[async_trait]
impl PerformanceRepository for PerformanceSnapshot {
    async fn all_batting_performances(&self) -> Result<Vec<BattingRow>, RepositoryError> {
        Ok(self.batting.clone())
    }

    async fn all_bowling_performances(&self) -> Result<Vec<BowlingRow>, RepositoryError> {
        Ok(self.bowling.clone())
    }

    async fn snapshot(&self) -> Result<PerformanceSnapshot, RepositoryError> {
        Ok(self.clone())
    }
}
