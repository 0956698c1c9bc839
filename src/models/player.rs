//! Player model.

use serde::{Deserialize, Serialize};

use super::validation::{require_not_blank, ValidationError};
use super::PlayerId;

/// Earliest accepted career-start year.
pub const MIN_START_YEAR: i32 = 1800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

/// Primary playing role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerRole {
    Batsman,
    Bowler,
    AllRounder,
    WicketKeeper,
}

/// A registered player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(rename = "playerId")]
    pub id: PlayerId,

    /// Display name
    #[serde(rename = "playerName")]
    pub name: String,

    pub country: String,

    /// Year the player's career started
    pub start_year: i32,

    pub gender: Gender,

    pub role: PlayerRole,

    /// Free-text notes
    pub notes: Option<String>,
}

/// Create/update payload for a player.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRequest {
    pub player_name: String,
    pub country: String,
    pub start_year: i32,
    pub gender: Gender,
    pub role: PlayerRole,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PlayerRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_not_blank(&self.player_name, "Player name is required")?;
        require_not_blank(&self.country, "Country is required")?;
        if self.start_year < MIN_START_YEAR {
            return Err(ValidationError::new("Start year must be valid"));
        }
        Ok(())
    }

    /// Build a player with the given ID, validating first.
    pub fn into_player(self, id: PlayerId) -> Result<Player, ValidationError> {
        self.validate()?;
        Ok(Player {
            id,
            name: self.player_name,
            country: self.country,
            start_year: self.start_year,
            gender: self.gender,
            role: self.role,
            notes: self.notes,
        })
    }
}
