//! Leaderboard analytics.
//!
//! Computes best-of statistics from stored performances:
//! - Aggregate leaders (runs, wickets, maidens, sixes, fours)
//! - Ratio leaders (batting average, bowling economy)
//! - Milestone counts and most recent milestones (centuries, five-wicket hauls)
//!
//! The engine fetches one snapshot per call and never caches.

pub mod metrics;
pub mod repository;
pub mod summary;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

pub use metrics::{Direction, Leader};
pub use repository::{
    BattingRow, BowlingRow, PerformanceRepository, PerformanceSnapshot, RepositoryError,
};
pub use summary::{AnalyticsSummary, MetricResults};

/// Errors that fail a summary computation.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    DataAccess(#[from] RepositoryError),

    #[error("Timed out after {0:?} fetching performance data")]
    Timeout(Duration),
}

/// Run every extractor over one snapshot.
pub fn compute_metrics(snapshot: &PerformanceSnapshot) -> MetricResults {
    let batting = &snapshot.batting;
    let bowling = &snapshot.bowling;

    MetricResults {
        highest_runs: metrics::highest_runs(batting),
        highest_wickets: metrics::highest_wickets(bowling),
        most_maiden_overs: metrics::most_maiden_overs(bowling),
        best_batting_average: metrics::best_batting_average(batting),
        best_bowling_economy: metrics::best_bowling_economy(bowling),
        total_centuries: metrics::total_centuries(batting),
        total_five_wicket_hauls: metrics::total_five_wicket_hauls(bowling),
        most_recent_century: metrics::most_recent_century(batting),
        most_recent_five_wicket_haul: metrics::most_recent_five_wicket_haul(bowling),
        most_sixes: metrics::most_sixes(batting),
        most_fours: metrics::most_fours(batting),
    }
}

/// Stateless summary engine over a performance repository.
#[derive(Clone)]
pub struct AnalyticsEngine {
    repository: Arc<dyn PerformanceRepository>,
    fetch_timeout: Option<Duration>,
}

impl AnalyticsEngine {
    pub fn new(repository: Arc<dyn PerformanceRepository>) -> Self {
        Self {
            repository,
            fetch_timeout: None,
        }
    }

    /// Bound the snapshot fetch. The whole call fails when it elapses.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    async fn fetch(&self) -> Result<PerformanceSnapshot, AnalyticsError> {
        match self.fetch_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.repository.snapshot()).await {
                Ok(result) => Ok(result?),
                Err(_) => {
                    warn!("Performance fetch exceeded {:?}", limit);
                    Err(AnalyticsError::Timeout(limit))
                }
            },
            None => Ok(self.repository.snapshot().await?),
        }
    }

    /// Fetch a fresh snapshot and compute every leaderboard metric.
    pub async fn compute_summary(&self) -> Result<AnalyticsSummary, AnalyticsError> {
        let snapshot = self.fetch().await?;
        debug!(
            "Computing analytics over {} batting and {} bowling rows",
            snapshot.batting.len(),
            snapshot.bowling.len()
        );
        Ok(AnalyticsSummary::from(compute_metrics(&snapshot)))
    }
}
