use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

/// Leaderboard row as the API reports it; response fields the client does
/// not render are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreEntry {
    pub username: String,
    pub score: i32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_players: i64,
    pub total_games: i64,
    pub highest_score: i32,
    pub average_score: i32,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Thin HTTP client for the score API
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        Ok(ApiClient {
            http: Client::new(),
            base_url,
        })
    }

    pub async fn submit_score(&self, username: &str, score: u32) -> Result<ScoreEntry> {
        let url = self.base_url.join("/api/scores")?;
        let response = self
            .http
            .post(url)
            .json(&json!({ "username": username, "score": score }))
            .send()
            .await
            .context("Failed to reach the score API")?;
        read_json(response).await
    }

    pub async fn top_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>> {
        let mut url = self.base_url.join("/api/scores")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to reach the score API")?;
        read_json(response).await
    }

    pub async fn user_scores(&self, username: &str) -> Result<Vec<ScoreEntry>> {
        let mut url = self.base_url.join("/api/scores")?;
        url.query_pairs_mut().append_pair("username", username);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to reach the score API")?;
        read_json(response).await
    }

    pub async fn stats(&self) -> Result<StatsSummary> {
        let mut url = self.base_url.join("/api/scores")?;
        url.query_pairs_mut().append_pair("stats", "true");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to reach the score API")?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| "no error body".to_string());
        return Err(anyhow!("score API returned {}: {}", status, message));
    }
    response
        .json()
        .await
        .context("Failed to decode score API response")
}

fn normalize_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("Invalid server URL: {}", raw))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(anyhow!("Server URL must use http or https: {}", raw));
    }
    Ok(url)
}
