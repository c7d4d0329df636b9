pub mod models;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use models::{ScoreRecord, StatsSummary};

/// Default leaderboard size
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
/// Most rows a single leaderboard query will return
pub const MAX_LEADERBOARD_LIMIT: usize = 100;
/// How many of a player's own scores are reported
pub const USER_SCORES_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("username cannot be empty")]
    EmptyUsername,
    #[error("score must be a non-negative number")]
    InvalidScore,
    #[error("score storage failed")]
    Storage(#[from] anyhow::Error),
}

/// Submission checks, re-run server-side even though the game client
/// already gates its input.
pub fn validate_submission(username: &str, score: i32) -> Result<(), ScoreError> {
    if username.trim().is_empty() {
        return Err(ScoreError::EmptyUsername);
    }
    if score < 0 {
        return Err(ScoreError::InvalidScore);
    }
    Ok(())
}

#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Persist one finished game's score and return the stored record.
    async fn submit_score(&self, username: &str, score: i32) -> Result<ScoreRecord, ScoreError>;

    /// Highest scores across all players, descending.
    async fn top_scores(&self, limit: usize) -> Result<Vec<ScoreRecord>, ScoreError>;

    /// One player's best scores, descending, capped at `USER_SCORES_LIMIT`.
    async fn user_scores(&self, username: &str) -> Result<Vec<ScoreRecord>, ScoreError>;

    /// Aggregates over every stored score.
    async fn stats(&self) -> Result<StatsSummary, ScoreError>;
}
