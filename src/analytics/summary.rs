//! The reported leaderboard summary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::metrics::Leader;

/// Raw extractor output, one slot per metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricResults {
    pub highest_runs: Option<Leader<u64>>,
    pub highest_wickets: Option<Leader<u64>>,
    pub most_maiden_overs: Option<Leader<u64>>,
    pub best_batting_average: Option<Leader<f64>>,
    pub best_bowling_economy: Option<Leader<f64>>,
    pub total_centuries: Option<Leader<u32>>,
    pub total_five_wicket_hauls: Option<Leader<u32>>,
    pub most_recent_century: Option<Leader<NaiveDate>>,
    pub most_recent_five_wicket_haul: Option<Leader<NaiveDate>>,
    pub most_sixes: Option<Leader<u64>>,
    pub most_fours: Option<Leader<u64>>,
}

/// Best-of statistics across every recorded performance.
///
/// Each metric is a player/value pair; both halves are `None` together when
/// no performance qualifies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub highest_runs_player: Option<String>,
    pub highest_runs: Option<u64>,

    pub highest_wickets_player: Option<String>,
    pub highest_wickets: Option<u64>,

    pub most_maiden_overs_player: Option<String>,
    pub most_maiden_overs: Option<u64>,

    pub best_batting_average_player: Option<String>,
    pub best_batting_average: Option<f64>,

    pub best_bowling_economy_player: Option<String>,
    pub best_bowling_economy: Option<f64>,

    pub total_centuries_player: Option<String>,
    pub total_centuries: Option<u32>,

    pub total_five_wicket_hauls_player: Option<String>,
    pub total_five_wicket_hauls: Option<u32>,

    pub most_recent_century_player: Option<String>,
    pub most_recent_century_date: Option<NaiveDate>,

    pub most_recent_five_wicket_haul_player: Option<String>,
    pub most_recent_five_wicket_haul_date: Option<NaiveDate>,

    pub most_sixes_player: Option<String>,
    pub most_sixes: Option<u64>,

    pub most_fours_player: Option<String>,
    pub most_fours: Option<u64>,
}

fn split<V>(leader: Option<Leader<V>>) -> (Option<String>, Option<V>) {
    match leader {
        Some(Leader { player, value }) => (Some(player), Some(value)),
        None => (None, None),
    }
}

impl From<MetricResults> for AnalyticsSummary {
    fn from(results: MetricResults) -> Self {
        let (highest_runs_player, highest_runs) = split(results.highest_runs);
        let (highest_wickets_player, highest_wickets) = split(results.highest_wickets);
        let (most_maiden_overs_player, most_maiden_overs) = split(results.most_maiden_overs);
        let (best_batting_average_player, best_batting_average) =
            split(results.best_batting_average);
        let (best_bowling_economy_player, best_bowling_economy) =
            split(results.best_bowling_economy);
        let (total_centuries_player, total_centuries) = split(results.total_centuries);
        let (total_five_wicket_hauls_player, total_five_wicket_hauls) =
            split(results.total_five_wicket_hauls);
        let (most_recent_century_player, most_recent_century_date) =
            split(results.most_recent_century);
        let (most_recent_five_wicket_haul_player, most_recent_five_wicket_haul_date) =
            split(results.most_recent_five_wicket_haul);
        let (most_sixes_player, most_sixes) = split(results.most_sixes);
        let (most_fours_player, most_fours) = split(results.most_fours);

        Self {
            highest_runs_player,
            highest_runs,
            highest_wickets_player,
            highest_wickets,
            most_maiden_overs_player,
            most_maiden_overs,
            best_batting_average_player,
            best_batting_average,
            best_bowling_economy_player,
            best_bowling_economy,
            total_centuries_player,
            total_centuries,
            total_five_wicket_hauls_player,
            total_five_wicket_hauls,
            most_recent_century_player,
            most_recent_century_date,
            most_recent_five_wicket_haul_player,
            most_recent_five_wicket_haul_date,
            most_sixes_player,
            most_sixes,
            most_fours_player,
            most_fours,
        }
    }
}
