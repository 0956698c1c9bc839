//! In-memory record store backed by JSONL files.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{error, info, warn};

use super::{EntityType, JsonlReader, JsonlWriter, StagedFile, StorageConfig, StorageError};
use crate::analytics::{
    BattingRow, BowlingRow, PerformanceRepository, PerformanceSnapshot, RepositoryError,
};
use crate::models::{
    BattingId, BattingPerformance, BattingRequest, BowlingId, BowlingPerformance, BowlingRequest,
    EntityId, Player, PlayerId, PlayerRequest,
};

/// Country filter value meaning "every country".
pub const ALL_COUNTRIES: &str = "All";

/// Players and performances, held in memory and persisted on every change.
#[derive(Debug)]
pub struct RecordStore {
    config: StorageConfig,
    players: Vec<Player>,
    batting: Vec<BattingPerformance>,
    bowling: Vec<BowlingPerformance>,
}

impl RecordStore {
    /// Load every entity file from the data directory.
    pub fn open(config: StorageConfig) -> Result<Self, StorageError> {
        let players = JsonlReader::<Player>::for_entity(&config, EntityType::Player).read_all()?;
        let batting =
            JsonlReader::<BattingPerformance>::for_entity(&config, EntityType::Batting).read_all()?;
        let bowling =
            JsonlReader::<BowlingPerformance>::for_entity(&config, EntityType::Bowling).read_all()?;

        info!(
            "Loaded {} players, {} batting and {} bowling records from {:?}",
            players.len(),
            batting.len(),
            bowling.len(),
            config.data_dir
        );

        Ok(Self {
            config,
            players,
            batting,
            bowling,
        })
    }

    fn persist<T: Serialize>(&self, entity: EntityType, records: &[T]) -> Result<(), StorageError> {
        JsonlWriter::for_entity(&self.config, entity).write_all(records)?;
        Ok(())
    }

    fn stage<T: Serialize>(
        &self,
        entity: EntityType,
        records: &[T],
    ) -> Result<StagedFile, StorageError> {
        JsonlWriter::for_entity(&self.config, entity).stage(records)
    }

    /// Commit staged files in order. If a rename fails, files already
    /// committed are rewritten from the in-memory state.
    fn commit_all(&self, staged: Vec<(EntityType, StagedFile)>) -> Result<(), StorageError> {
        let mut committed = Vec::new();
        for (entity, file) in staged {
            if let Err(e) = file.commit() {
                self.restore(&committed);
                return Err(e);
            }
            committed.push(entity);
        }
        Ok(())
    }

    fn restore(&self, entities: &[EntityType]) {
        for &entity in entities {
            let result = match entity {
                EntityType::Player => self.persist(entity, &self.players),
                EntityType::Batting => self.persist(entity, &self.batting),
                EntityType::Bowling => self.persist(entity, &self.bowling),
            };
            if let Err(e) = result {
                error!("Failed to restore {} after aborted write: {}", entity.filename(), e);
            }
        }
    }

    fn require_player(&self, id: &PlayerId) -> Result<&Player, StorageError> {
        self.players
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| StorageError::PlayerNotFound(id.clone()))
    }

    // ── Players ─────────────────────────────────────────────────

    /// All players, optionally filtered by a case-insensitive name fragment.
    pub fn list_players(&self, name: Option<&str>) -> Vec<Player> {
        match name.map(|n| n.trim().to_lowercase()) {
            Some(needle) if !needle.is_empty() => self
                .players
                .iter()
                .filter(|p| p.name.to_lowercase().contains(&needle))
                .cloned()
                .collect(),
            _ => self.players.clone(),
        }
    }

    pub fn players_by_country(&self, country: &str) -> Vec<Player> {
        if country == ALL_COUNTRIES {
            return self.players.clone();
        }
        self.players
            .iter()
            .filter(|p| p.country == country)
            .cloned()
            .collect()
    }

    /// Sorted, de-duplicated country names.
    pub fn distinct_countries(&self) -> Vec<String> {
        self.players
            .iter()
            .map(|p| p.country.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn get_player(&self, id: &PlayerId) -> Result<Player, StorageError> {
        self.require_player(id).cloned()
    }

    pub fn create_player(&mut self, request: PlayerRequest) -> Result<Player, StorageError> {
        let player = request.into_player(EntityId::generate())?;

        let mut players = self.players.clone();
        players.push(player.clone());
        self.persist(EntityType::Player, &players)?;
        self.players = players;

        info!("Created player {} ({})", player.name, player.id);
        Ok(player)
    }

    pub fn update_player(
        &mut self,
        id: &PlayerId,
        request: PlayerRequest,
    ) -> Result<Player, StorageError> {
        let idx = self
            .players
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| StorageError::PlayerNotFound(id.clone()))?;
        let player = request.into_player(id.clone())?;

        let mut players = self.players.clone();
        players[idx] = player.clone();
        self.persist(EntityType::Player, &players)?;
        self.players = players;

        Ok(player)
    }

    /// Delete a player together with all of its performances.
    pub fn delete_player(&mut self, id: &PlayerId) -> Result<(), StorageError> {
        self.require_player(id)?;

        let batting: Vec<_> = self
            .batting
            .iter()
            .filter(|b| &b.player_id != id)
            .cloned()
            .collect();
        let bowling: Vec<_> = self
            .bowling
            .iter()
            .filter(|b| &b.player_id != id)
            .cloned()
            .collect();
        let players: Vec<_> = self.players.iter().filter(|p| &p.id != id).cloned().collect();

        // Every file is fully written before any of them replaces its target.
        let mut staged = Vec::with_capacity(3);
        if batting.len() != self.batting.len() {
            staged.push((EntityType::Batting, self.stage(EntityType::Batting, &batting)?));
        }
        if bowling.len() != self.bowling.len() {
            staged.push((EntityType::Bowling, self.stage(EntityType::Bowling, &bowling)?));
        }
        staged.push((EntityType::Player, self.stage(EntityType::Player, &players)?));
        self.commit_all(staged)?;

        info!(
            "Deleted player {} with {} batting and {} bowling records",
            id,
            self.batting.len() - batting.len(),
            self.bowling.len() - bowling.len()
        );

        self.batting = batting;
        self.bowling = bowling;
        self.players = players;
        Ok(())
    }

    // ── Batting ─────────────────────────────────────────────────

    pub fn add_batting(
        &mut self,
        request: BattingRequest,
    ) -> Result<BattingPerformance, StorageError> {
        self.require_player(&request.player_id)?;
        let record = request.into_performance(EntityId::generate())?;

        let mut batting = self.batting.clone();
        batting.push(record.clone());
        self.persist(EntityType::Batting, &batting)?;
        self.batting = batting;

        Ok(record)
    }

    pub fn get_batting(&self, id: &BattingId) -> Result<BattingPerformance, StorageError> {
        self.batting
            .iter()
            .find(|b| &b.id == id)
            .cloned()
            .ok_or_else(|| StorageError::BattingNotFound(id.clone()))
    }

    pub fn batting_for_player(
        &self,
        player_id: &PlayerId,
    ) -> Result<Vec<BattingPerformance>, StorageError> {
        self.require_player(player_id)?;
        Ok(self
            .batting
            .iter()
            .filter(|b| &b.player_id == player_id)
            .cloned()
            .collect())
    }

    pub fn update_batting(
        &mut self,
        id: &BattingId,
        request: BattingRequest,
    ) -> Result<BattingPerformance, StorageError> {
        let idx = self
            .batting
            .iter()
            .position(|b| &b.id == id)
            .ok_or_else(|| StorageError::BattingNotFound(id.clone()))?;
        self.require_player(&request.player_id)?;
        let record = request.into_performance(id.clone())?;

        let mut batting = self.batting.clone();
        batting[idx] = record.clone();
        self.persist(EntityType::Batting, &batting)?;
        self.batting = batting;

        Ok(record)
    }

    pub fn delete_batting(&mut self, id: &BattingId) -> Result<(), StorageError> {
        if !self.batting.iter().any(|b| &b.id == id) {
            return Err(StorageError::BattingNotFound(id.clone()));
        }

        let batting: Vec<_> = self.batting.iter().filter(|b| &b.id != id).cloned().collect();
        self.persist(EntityType::Batting, &batting)?;
        self.batting = batting;
        Ok(())
    }

    // ── Bowling ─────────────────────────────────────────────────

    pub fn add_bowling(
        &mut self,
        request: BowlingRequest,
    ) -> Result<BowlingPerformance, StorageError> {
        self.require_player(&request.player_id)?;
        let record = request.into_performance(EntityId::generate())?;

        let mut bowling = self.bowling.clone();
        bowling.push(record.clone());
        self.persist(EntityType::Bowling, &bowling)?;
        self.bowling = bowling;

        Ok(record)
    }

    pub fn get_bowling(&self, id: &BowlingId) -> Result<BowlingPerformance, StorageError> {
        self.bowling
            .iter()
            .find(|b| &b.id == id)
            .cloned()
            .ok_or_else(|| StorageError::BowlingNotFound(id.clone()))
    }

    pub fn bowling_for_player(
        &self,
        player_id: &PlayerId,
    ) -> Result<Vec<BowlingPerformance>, StorageError> {
        self.require_player(player_id)?;
        Ok(self
            .bowling
            .iter()
            .filter(|b| &b.player_id == player_id)
            .cloned()
            .collect())
    }

    pub fn update_bowling(
        &mut self,
        id: &BowlingId,
        request: BowlingRequest,
    ) -> Result<BowlingPerformance, StorageError> {
        let idx = self
            .bowling
            .iter()
            .position(|b| &b.id == id)
            .ok_or_else(|| StorageError::BowlingNotFound(id.clone()))?;
        self.require_player(&request.player_id)?;
        let record = request.into_performance(id.clone())?;

        let mut bowling = self.bowling.clone();
        bowling[idx] = record.clone();
        self.persist(EntityType::Bowling, &bowling)?;
        self.bowling = bowling;

        Ok(record)
    }

    pub fn delete_bowling(&mut self, id: &BowlingId) -> Result<(), StorageError> {
        if !self.bowling.iter().any(|b| &b.id == id) {
            return Err(StorageError::BowlingNotFound(id.clone()));
        }

        let bowling: Vec<_> = self.bowling.iter().filter(|b| &b.id != id).cloned().collect();
        self.persist(EntityType::Bowling, &bowling)?;
        self.bowling = bowling;
        Ok(())
    }

    // ── Analytics view ──────────────────────────────────────────

    /// Performances joined with player names, in stored order.
    pub fn performance_snapshot(&self) -> PerformanceSnapshot {
        let names: HashMap<&PlayerId, &str> = self
            .players
            .iter()
            .map(|p| (&p.id, p.name.as_str()))
            .collect();

        let batting = self
            .batting
            .iter()
            .filter_map(|b| match names.get(&b.player_id) {
                Some(name) => Some(BattingRow {
                    player_id: b.player_id.clone(),
                    player_name: name.to_string(),
                    runs: b.runs,
                    sixes: b.sixes,
                    fours: b.fours,
                    match_date: b.match_date,
                }),
                None => {
                    warn!("Batting record {} references unknown player {}", b.id, b.player_id);
                    None
                }
            })
            .collect();

        let bowling = self
            .bowling
            .iter()
            .filter_map(|b| match names.get(&b.player_id) {
                Some(name) => Some(BowlingRow {
                    player_id: b.player_id.clone(),
                    player_name: name.to_string(),
                    overs: b.overs,
                    maidens: b.maidens,
                    wickets_taken: b.wickets_taken,
                    runs_conceded: b.runs_conceded,
                    match_date: b.match_date,
                }),
                None => {
                    warn!("Bowling record {} references unknown player {}", b.id, b.player_id);
                    None
                }
            })
            .collect();

        PerformanceSnapshot { batting, bowling }
    }
}

/// Shared handle to the record store.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    inner: Arc<RwLock<RecordStore>>,
}

impl StoreHandle {
    pub fn new(store: RecordStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, RecordStore> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, RecordStore> {
        self.inner.write().await
    }
}

#[async_trait]
impl PerformanceRepository for StoreHandle {
    async fn all_batting_performances(&self) -> Result<Vec<BattingRow>, RepositoryError> {
        Ok(self.read().await.performance_snapshot().batting)
    }

    async fn all_bowling_performances(&self) -> Result<Vec<BowlingRow>, RepositoryError> {
        Ok(self.read().await.performance_snapshot().bowling)
    }

    /// Both sequences under one read lock.
    async fn snapshot(&self) -> Result<PerformanceSnapshot, RepositoryError> {
        Ok(self.read().await.performance_snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, PlayerRole};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> RecordStore {
        RecordStore::open(StorageConfig::new(dir.path().to_path_buf())).unwrap()
    }

    fn player_request(name: &str, country: &str) -> PlayerRequest {
        PlayerRequest {
            player_name: name.to_string(),
            country: country.to_string(),
            start_year: 2010,
            gender: Gender::Male,
            role: PlayerRole::AllRounder,
            notes: Some("test".to_string()),
        }
    }

    fn batting_request(player_id: &PlayerId, runs: i64, date: &str) -> BattingRequest {
        BattingRequest {
            player_id: player_id.clone(),
            runs,
            balls_faced: 60,
            sixes: 1,
            fours: 4,
            opponent: "Pakistan".to_string(),
            match_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    fn bowling_request(player_id: &PlayerId, wickets: i64) -> BowlingRequest {
        BowlingRequest {
            player_id: player_id.clone(),
            overs: 10.0,
            maidens: 2,
            runs_conceded: 41,
            wickets_taken: wickets,
            opponent: "Sri Lanka".to_string(),
            match_date: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
        }
    }

    #[test]
    fn test_create_and_reload_player() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let created = store.create_player(player_request("Babar Azam", "Pakistan")).unwrap();

        let reopened = open_store(&dir);
        assert_eq!(reopened.get_player(&created.id).unwrap(), created);
    }

    #[test]
    fn test_create_player_rejects_invalid_request() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let mut req = player_request("X", "India");
        req.start_year = 1700;
        let err = store.create_player(req).unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
        assert!(store.list_players(None).is_empty());
    }

    #[test]
    fn test_update_missing_player() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let err = store
            .update_player(&"missing".into(), player_request("A", "B"))
            .unwrap_err();
        assert!(matches!(err, StorageError::PlayerNotFound(_)));
    }

    #[test]
    fn test_update_player_keeps_id() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let created = store.create_player(player_request("Joe Root", "England")).unwrap();

        let updated = store
            .update_player(&created.id, player_request("Joe Root", "England Lions"))
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(store.get_player(&created.id).unwrap().country, "England Lions");
    }

    #[test]
    fn test_player_filters() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        store.create_player(player_request("Virat Kohli", "India")).unwrap();
        store.create_player(player_request("Rohit Sharma", "India")).unwrap();
        store.create_player(player_request("Kane Williamson", "New Zealand")).unwrap();

        assert_eq!(store.list_players(Some("kohli")).len(), 1);
        assert_eq!(store.list_players(Some("  ")).len(), 3);
        assert_eq!(store.players_by_country("India").len(), 2);
        assert_eq!(store.players_by_country(ALL_COUNTRIES).len(), 3);
        assert!(store.players_by_country("Nepal").is_empty());
        assert_eq!(store.distinct_countries(), vec!["India", "New Zealand"]);
    }

    #[test]
    fn test_batting_requires_existing_player() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);

        let err = store
            .add_batting(batting_request(&"ghost".into(), 10, "2024-01-01"))
            .unwrap_err();
        assert!(matches!(err, StorageError::PlayerNotFound(_)));
    }

    #[test]
    fn test_batting_crud() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let player = store.create_player(player_request("Steve Smith", "Australia")).unwrap();

        let innings = store
            .add_batting(batting_request(&player.id, 85, "2024-01-01"))
            .unwrap();
        assert_eq!(store.batting_for_player(&player.id).unwrap().len(), 1);

        let updated = store
            .update_batting(&innings.id, batting_request(&player.id, 105, "2024-01-01"))
            .unwrap();
        assert_eq!(updated.runs, 105);
        assert_eq!(store.get_batting(&innings.id).unwrap().runs, 105);

        store.delete_batting(&innings.id).unwrap();
        assert!(matches!(
            store.get_batting(&innings.id),
            Err(StorageError::BattingNotFound(_))
        ));
        assert!(matches!(
            store.delete_batting(&innings.id),
            Err(StorageError::BattingNotFound(_))
        ));
    }

    #[test]
    fn test_bowling_crud() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let player = store.create_player(player_request("Pat Cummins", "Australia")).unwrap();

        let spell = store.add_bowling(bowling_request(&player.id, 3)).unwrap();
        let updated = store
            .update_bowling(&spell.id, bowling_request(&player.id, 6))
            .unwrap();
        assert!(crate::models::is_five_wicket_haul(updated.wickets_taken));

        let reopened = open_store(&dir);
        assert_eq!(reopened.get_bowling(&spell.id).unwrap().wickets_taken, 6);

        store.delete_bowling(&spell.id).unwrap();
        assert!(store.bowling_for_player(&player.id).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_batting_update_leaves_record_untouched() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let player = store.create_player(player_request("Shai Hope", "West Indies")).unwrap();
        let innings = store
            .add_batting(batting_request(&player.id, 40, "2024-01-01"))
            .unwrap();

        let mut bad = batting_request(&player.id, 40, "2024-01-01");
        bad.balls_faced = 0;
        assert!(store.update_batting(&innings.id, bad).is_err());
        assert_eq!(store.get_batting(&innings.id).unwrap(), innings);
    }

    #[test]
    fn test_delete_player_cascades() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let keep = store.create_player(player_request("Keep", "India")).unwrap();
        let gone = store.create_player(player_request("Gone", "India")).unwrap();

        store.add_batting(batting_request(&keep.id, 10, "2024-01-01")).unwrap();
        store.add_batting(batting_request(&gone.id, 20, "2024-01-01")).unwrap();
        store.add_bowling(bowling_request(&gone.id, 2)).unwrap();

        store.delete_player(&gone.id).unwrap();

        let reopened = open_store(&dir);
        assert!(reopened.get_player(&gone.id).is_err());
        let snapshot = reopened.performance_snapshot();
        assert_eq!(snapshot.batting.len(), 1);
        assert_eq!(snapshot.batting[0].player_name, "Keep");
        assert!(snapshot.bowling.is_empty());
    }

    #[test]
    fn test_failed_cascade_delete_leaves_disk_untouched() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let player = store.create_player(player_request("Shaheen Afridi", "Pakistan")).unwrap();
        store.add_batting(batting_request(&player.id, 25, "2024-01-01")).unwrap();
        store.add_bowling(bowling_request(&player.id, 4)).unwrap();

        // Block the bowling rewrite after batting has been staged.
        std::fs::create_dir(dir.path().join("bowling.jsonl.tmp")).unwrap();

        assert!(store.delete_player(&player.id).is_err());
        assert_eq!(store.batting_for_player(&player.id).unwrap().len(), 1);
        assert!(!dir.path().join("batting.jsonl.tmp").exists());

        let reopened = open_store(&dir);
        assert!(reopened.get_player(&player.id).is_ok());
        assert_eq!(reopened.batting_for_player(&player.id).unwrap().len(), 1);
        assert_eq!(reopened.bowling_for_player(&player.id).unwrap().len(), 1);
    }

    #[test]
    fn test_snapshot_joins_names_in_stored_order() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let a = store.create_player(player_request("Player A", "India")).unwrap();
        let b = store.create_player(player_request("Player B", "India")).unwrap();

        store.add_batting(batting_request(&b.id, 30, "2024-01-01")).unwrap();
        store.add_batting(batting_request(&a.id, 70, "2024-01-02")).unwrap();

        let snapshot = store.performance_snapshot();
        let names: Vec<_> = snapshot.batting.iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["Player B", "Player A"]);
        assert_eq!(snapshot.batting[1].runs, 70);
    }

    #[tokio::test]
    async fn test_store_handle_repository() {
        let dir = TempDir::new().unwrap();
        let handle = StoreHandle::new(open_store(&dir));
        let player = handle
            .write()
            .await
            .create_player(player_request("Player A", "India"))
            .unwrap();
        handle
            .write()
            .await
            .add_bowling(bowling_request(&player.id, 5))
            .unwrap();

        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.batting.is_empty());
        assert_eq!(snapshot.bowling.len(), 1);
        assert_eq!(handle.all_bowling_performances().await.unwrap().len(), 1);
    }
}
