use thiserror::Error;

use crate::model::game::{Game, GameId};

/// Every way a registry operation can be refused. None of these leave partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreboardError {
    #[error("Either [{home_team}] or [{away_team}] already plays a game: [{existing}].")]
    GameAlreadyExists {
        home_team: String,
        away_team: String,
        existing: Box<Game>,
    },

    #[error("The game with ID [{0}] does not exist.")]
    GameNotFound(GameId),

    #[error("All scores should be non-negative, got [{home_score}]-[{away_score}].")]
    InvalidScore { home_score: i64, away_score: i64 },

    #[error("Invalid teams: {0}")]
    InvalidTeams(String),
}

impl ScoreboardError {
    /// Stable machine-readable name, used by the command surface.
    pub fn kind(&self) -> &'static str {
        match self {
            ScoreboardError::GameAlreadyExists { .. } => "game_already_exists",
            ScoreboardError::GameNotFound(_) => "game_not_found",
            ScoreboardError::InvalidScore { .. } => "invalid_score",
            ScoreboardError::InvalidTeams(_) => "invalid_teams",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoreboardError>;
