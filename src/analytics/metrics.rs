//! Leaderboard metric extractors.
//!
//! Every metric follows the same shape: group rows by player in
//! first-encountered order, fold each group into an aggregate, turn the
//! aggregate into a ranking value (or drop the player), then keep the single
//! best value. Ties keep the earlier group, so every metric breaks ties the
//! same way.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use super::repository::{BattingRow, BowlingRow};
use crate::models::{is_century, is_five_wicket_haul, PlayerId};

/// Which end of the ranking wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// The single leading player for a metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Leader<V> {
    pub player: String,
    pub value: V,
}

/// Rows that can be grouped by owning player.
pub trait PlayerRow {
    fn player_id(&self) -> &PlayerId;
    fn player_name(&self) -> &str;
}

impl PlayerRow for BattingRow {
    fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    fn player_name(&self) -> &str {
        &self.player_name
    }
}

impl PlayerRow for BowlingRow {
    fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    fn player_name(&self) -> &str {
        &self.player_name
    }
}

/// Fold rows into one aggregate per player, keeping first-seen order.
fn group_by_player<'a, R, A, I, F>(rows: I, mut fold: F) -> Vec<(String, A)>
where
    R: PlayerRow + 'a,
    A: Default,
    I: IntoIterator<Item = &'a R>,
    F: FnMut(&mut A, &'a R),
{
    let mut index: HashMap<&'a PlayerId, usize> = HashMap::new();
    let mut groups: Vec<(String, A)> = Vec::new();

    for row in rows {
        let slot = *index.entry(row.player_id()).or_insert_with(|| {
            groups.push((row.player_name().to_string(), A::default()));
            groups.len() - 1
        });
        fold(&mut groups[slot].1, row);
    }

    groups
}

/// Keep the best value; a later candidate must be strictly better to win.
fn select_leader<V, I>(candidates: I, direction: Direction) -> Option<Leader<V>>
where
    V: PartialOrd,
    I: IntoIterator<Item = (String, V)>,
{
    let mut best: Option<Leader<V>> = None;

    for (player, value) in candidates {
        let better = match &best {
            None => true,
            Some(current) => match direction {
                Direction::Descending => value > current.value,
                Direction::Ascending => value < current.value,
            },
        };
        if better {
            best = Some(Leader { player, value });
        }
    }

    best
}

/// Group, score and select in one pass. `key` returns `None` to exclude a
/// player from the ranking.
pub fn rank_players<'a, R, A, V, I, F, K>(
    rows: I,
    fold: F,
    key: K,
    direction: Direction,
) -> Option<Leader<V>>
where
    R: PlayerRow + 'a,
    A: Default,
    V: PartialOrd,
    I: IntoIterator<Item = &'a R>,
    F: FnMut(&mut A, &'a R),
    K: Fn(A) -> Option<V>,
{
    let scored = group_by_player(rows, fold)
        .into_iter()
        .filter_map(|(player, acc)| key(acc).map(|value| (player, value)));
    select_leader(scored, direction)
}

fn sum_by<'a, R, F>(rows: &'a [R], field: F) -> Option<Leader<u64>>
where
    R: PlayerRow,
    F: Fn(&R) -> u32,
{
    rank_players(
        rows,
        |total: &mut u64, row| *total += u64::from(field(row)),
        Some,
        Direction::Descending,
    )
}

fn count_where<'a, R, P>(rows: &'a [R], predicate: P) -> Option<Leader<u32>>
where
    R: PlayerRow,
    P: Fn(&R) -> bool,
{
    rank_players(
        rows.iter().filter(|&row| predicate(row)),
        |count: &mut u32, _| *count += 1,
        Some,
        Direction::Descending,
    )
}

fn latest_where<'a, R, P, D>(rows: &'a [R], predicate: P, date: D) -> Option<Leader<NaiveDate>>
where
    R: PlayerRow,
    P: Fn(&R) -> bool,
    D: Fn(&R) -> NaiveDate,
{
    rank_players(
        rows.iter().filter(|&row| predicate(row)),
        |latest: &mut Option<NaiveDate>, row| {
            let d = date(row);
            if latest.map_or(true, |current| d > current) {
                *latest = Some(d);
            }
        },
        |latest| latest,
        Direction::Descending,
    )
}

pub fn highest_runs(rows: &[BattingRow]) -> Option<Leader<u64>> {
    sum_by(rows, |row| row.runs)
}

pub fn most_sixes(rows: &[BattingRow]) -> Option<Leader<u64>> {
    sum_by(rows, |row| row.sixes)
}

pub fn most_fours(rows: &[BattingRow]) -> Option<Leader<u64>> {
    sum_by(rows, |row| row.fours)
}

pub fn highest_wickets(rows: &[BowlingRow]) -> Option<Leader<u64>> {
    sum_by(rows, |row| row.wickets_taken)
}

pub fn most_maiden_overs(rows: &[BowlingRow]) -> Option<Leader<u64>> {
    sum_by(rows, |row| row.maidens)
}

/// Total runs divided by the number of distinct match dates played.
///
/// Several innings on one date count once in the denominator.
pub fn best_batting_average(rows: &[BattingRow]) -> Option<Leader<f64>> {
    #[derive(Default)]
    struct Acc {
        runs: u64,
        dates: HashSet<NaiveDate>,
    }

    rank_players(
        rows,
        |acc: &mut Acc, row| {
            acc.runs += u64::from(row.runs);
            acc.dates.insert(row.match_date);
        },
        |acc| {
            if acc.dates.is_empty() {
                None
            } else {
                Some(acc.runs as f64 / acc.dates.len() as f64)
            }
        },
        Direction::Descending,
    )
}

/// Runs conceded per over; lowest wins.
pub fn best_bowling_economy(rows: &[BowlingRow]) -> Option<Leader<f64>> {
    #[derive(Default)]
    struct Acc {
        runs_conceded: u64,
        overs: f64,
    }

    rank_players(
        rows,
        |acc: &mut Acc, row| {
            acc.runs_conceded += u64::from(row.runs_conceded);
            acc.overs += row.overs;
        },
        |acc| {
            if acc.overs > 0.0 {
                Some(acc.runs_conceded as f64 / acc.overs)
            } else {
                None
            }
        },
        Direction::Ascending,
    )
}

pub fn total_centuries(rows: &[BattingRow]) -> Option<Leader<u32>> {
    count_where(rows, |row| is_century(row.runs))
}

pub fn total_five_wicket_hauls(rows: &[BowlingRow]) -> Option<Leader<u32>> {
    count_where(rows, |row| is_five_wicket_haul(row.wickets_taken))
}

pub fn most_recent_century(rows: &[BattingRow]) -> Option<Leader<NaiveDate>> {
    latest_where(rows, |row| is_century(row.runs), |row| row.match_date)
}

pub fn most_recent_five_wicket_haul(rows: &[BowlingRow]) -> Option<Leader<NaiveDate>> {
    latest_where(
        rows,
        |row| is_five_wicket_haul(row.wickets_taken),
        |row| row.match_date,
    )
}
