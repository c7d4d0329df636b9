use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{ScoreRecord, StatsSummary};
use super::{ScoreError, ScoreStore, USER_SCORES_LIMIT, validate_submission};

/// Postgres-backed score store. All queries go through the shared pool.
#[derive(Clone)]
pub struct PgScoreStore {
    pool: PgPool,
}

impl PgScoreStore {
    pub fn new(pool: PgPool) -> Self {
        PgScoreStore { pool }
    }
}

#[async_trait]
impl ScoreStore for PgScoreStore {
    async fn submit_score(&self, username: &str, score: i32) -> Result<ScoreRecord, ScoreError> {
        validate_submission(username, score)?;

        let record = sqlx::query_as::<_, ScoreRecord>(
            "INSERT INTO scores (id, username, score) VALUES ($1, $2, $3) \
             RETURNING id, username, score, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(score)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert score")?;

        Ok(record)
    }

    async fn top_scores(&self, limit: usize) -> Result<Vec<ScoreRecord>, ScoreError> {
        let records = sqlx::query_as::<_, ScoreRecord>(
            "SELECT id, username, score, created_at FROM scores \
             ORDER BY score DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch top scores")?;

        Ok(records)
    }

    async fn user_scores(&self, username: &str) -> Result<Vec<ScoreRecord>, ScoreError> {
        if username.trim().is_empty() {
            return Err(ScoreError::EmptyUsername);
        }

        let records = sqlx::query_as::<_, ScoreRecord>(
            "SELECT id, username, score, created_at FROM scores \
             WHERE username = $1 ORDER BY score DESC LIMIT $2",
        )
        .bind(username)
        .bind(USER_SCORES_LIMIT as i64)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch user scores")?;

        Ok(records)
    }

    async fn stats(&self) -> Result<StatsSummary, ScoreError> {
        let (total_players, total_games, highest_score, average_score): (i64, i64, i32, i32) =
            sqlx::query_as(
                "SELECT COUNT(DISTINCT username), COUNT(*), \
                 COALESCE(MAX(score), 0), \
                 COALESCE(CAST(ROUND(AVG(score)) AS INT4), 0) FROM scores",
            )
            .fetch_one(&self.pool)
            .await
            .context("Failed to fetch score stats")?;

        Ok(StatsSummary {
            total_players,
            total_games,
            highest_score,
            average_score,
        })
    }
}
