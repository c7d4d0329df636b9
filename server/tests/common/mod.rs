use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use uuid::Uuid;

use server::api::server::build_router;
use server::db::models::{ScoreRecord, StatsSummary};
use server::db::{ScoreError, ScoreStore, USER_SCORES_LIMIT, validate_submission};

/// In-memory stand-in for the Postgres store, honoring the same validation
/// and ordering contract so the router can be exercised without a database.
#[derive(Default)]
pub struct MemoryScoreStore {
    scores: Mutex<Vec<ScoreRecord>>,
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn submit_score(&self, username: &str, score: i32) -> Result<ScoreRecord, ScoreError> {
        validate_submission(username, score)?;
        let record = ScoreRecord {
            id: Uuid::new_v4(),
            username: username.to_string(),
            score,
            created_at: Utc::now(),
        };
        self.scores.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn top_scores(&self, limit: usize) -> Result<Vec<ScoreRecord>, ScoreError> {
        let mut scores = self.scores.lock().unwrap().clone();
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        scores.truncate(limit);
        Ok(scores)
    }

    async fn user_scores(&self, username: &str) -> Result<Vec<ScoreRecord>, ScoreError> {
        if username.trim().is_empty() {
            return Err(ScoreError::EmptyUsername);
        }
        let mut scores: Vec<ScoreRecord> = self
            .scores
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.username == username)
            .cloned()
            .collect();
        scores.sort_by(|a, b| b.score.cmp(&a.score));
        scores.truncate(USER_SCORES_LIMIT);
        Ok(scores)
    }

    async fn stats(&self) -> Result<StatsSummary, ScoreError> {
        let scores = self.scores.lock().unwrap();
        let total_games = scores.len() as i64;
        let total_players = scores
            .iter()
            .map(|record| record.username.as_str())
            .collect::<HashSet<_>>()
            .len() as i64;
        let highest_score = scores.iter().map(|record| record.score).max().unwrap_or(0);
        let average_score = if scores.is_empty() {
            0
        } else {
            let sum: i64 = scores.iter().map(|record| record.score as i64).sum();
            (sum as f64 / total_games as f64).round() as i32
        };
        Ok(StatsSummary {
            total_players,
            total_games,
            highest_score,
            average_score,
        })
    }
}

impl MemoryScoreStore {
    pub fn record_count(&self) -> usize {
        self.scores.lock().unwrap().len()
    }
}

pub fn test_app() -> (Router, Arc<MemoryScoreStore>) {
    let store = Arc::new(MemoryScoreStore::default());
    (build_router(store.clone()), store)
}
