use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::db::models::ScoreRecord;
use crate::db::{DEFAULT_LEADERBOARD_LIMIT, MAX_LEADERBOARD_LIMIT, ScoreError, ScoreStore};

/// State shared by the score endpoints
#[derive(Clone)]
pub struct ScoresState {
    pub store: Arc<dyn ScoreStore>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitScoreRequest {
    pub username: String,
    pub score: i32,
}

/// Query parameters for the scores endpoint. `stats` wins over `username`;
/// with neither set, the top of the leaderboard is returned.
#[derive(Debug, Deserialize)]
pub struct ScoresQuery {
    pub username: Option<String>,
    pub stats: Option<bool>,
    /// Number of leaderboard entries to return (default 10, max 100)
    pub limit: Option<usize>,
}

#[derive(Debug)]
pub struct AppError(ScoreError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ScoreError::EmptyUsername | ScoreError::InvalidScore => {
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            ScoreError::Storage(err) => {
                error!("Score storage error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<ScoreError> for AppError {
    fn from(err: ScoreError) -> Self {
        AppError(err)
    }
}

/// Record one finished game's score
pub async fn submit_score(
    State(state): State<ScoresState>,
    Json(req): Json<SubmitScoreRequest>,
) -> Result<Json<ScoreRecord>, AppError> {
    let record = state.store.submit_score(&req.username, req.score).await?;
    info!("Stored score {} for {}", record.score, record.username);
    Ok(Json(record))
}

/// Leaderboard reads: top scores by default, one user's scores with
/// `?username=`, aggregate statistics with `?stats=true`
pub async fn get_scores(
    State(state): State<ScoresState>,
    Query(query): Query<ScoresQuery>,
) -> Result<Response, AppError> {
    if query.stats.unwrap_or(false) {
        let stats = state.store.stats().await?;
        return Ok(Json(stats).into_response());
    }

    if let Some(username) = query.username {
        let scores = state.store.user_scores(&username).await?;
        return Ok(Json(scores).into_response());
    }

    let limit = query
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT);
    let scores = state.store.top_scores(limit).await?;
    Ok(Json(scores).into_response())
}
