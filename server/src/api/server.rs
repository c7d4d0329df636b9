use std::sync::Arc;

use anyhow::Result;
use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::scores::{self, ScoresState};
use crate::db::ScoreStore;

/// Build the API router. Separate from `run_api_server` so tests can drive
/// the handlers in-process without binding a socket.
pub fn build_router(store: Arc<dyn ScoreStore>) -> Router {
    let state = ScoresState { store };

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check))
        .route(
            "/api/scores",
            get(scores::get_scores).post(scores::submit_score),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server(addr: &str, store: Arc<dyn ScoreStore>) -> Result<()> {
    let app = build_router(store);

    let listener = TcpListener::bind(addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("API server error: {}", e))
}

async fn health_check() -> &'static str {
    "OK"
}
