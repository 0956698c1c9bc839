//! Filesystem record store.
//!
//! Players and their performances live as JSONL files in the data
//! directory. The whole store is loaded into memory on open and each
//! mutation rewrites the affected files.

mod jsonl;
mod store;

pub use jsonl::*;
pub use store::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{BattingId, BowlingId, PlayerId, ValidationError};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Player not found with id: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Batting stats not found with id: {0}")]
    BattingNotFound(BattingId),

    #[error("Bowling stats not found with id: {0}")]
    BowlingNotFound(BowlingId),

    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn path_for(&self, entity: EntityType) -> PathBuf {
        self.data_dir.join(entity.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
