// Upstream players endpoint client.

use thiserror::Error;
use tracing::warn;

use crate::players::normalize::{normalize, PlayerRecord, RawPlayer};

/// The NRL fantasy players feed.
pub const DEFAULT_PLAYERS_URL: &str = "https://fantasy.nrl.com/data/nrl/players.json";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("players request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("players endpoint returned status {0}")]
    Status(reqwest::StatusCode),
}

// ---------------------------------------------------------------------------
// PlayersClient
// ---------------------------------------------------------------------------

/// HTTP client for the upstream players feed.
pub struct PlayersClient {
    http: reqwest::Client,
    url: String,
}

impl PlayersClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Fetch and normalize the upstream player list.
    ///
    /// Upstream failures (unreachable host, non-success status, undecodable
    /// body) are logged and recovered to an empty list, so callers always
    /// get a usable result. No retry, no explicit timeout.
    pub async fn fetch_players(&self) -> Vec<PlayerRecord> {
        match self.try_fetch().await {
            Ok(players) => players,
            Err(e) => {
                warn!("failed to retrieve player data from {}: {e}", self.url);
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self) -> Result<Vec<PlayerRecord>, FetchError> {
        let response = self.http.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        let raw: Vec<RawPlayer> = response.json().await?;
        Ok(raw.into_iter().map(normalize).collect())
    }
}
