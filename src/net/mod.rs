//! External collaborators: puzzle provider and score service
//!
//! Both are consumed over plain JSON/HTTPS through the backend's `/api`
//! surface. The client is deliberately thin; everything interesting about a
//! response is decided by the parsers in [`types`], and everything
//! interesting about a failure is decided by the simulation (a dead provider
//! ends the game, a dead score service falls back to the local record).

#[cfg(target_arch = "wasm32")]
mod http;
pub mod types;

pub use types::{
    LeaderboardEntry, LeaderboardPage, Profile, Question, ScoreReport, ScoreSubmission,
};

use thiserror::Error;

/// Why a service call failed
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Non-2xx HTTP status
    #[error("http status {0}")]
    Status(u16),
    /// Transport-level failure (offline, DNS, CORS)
    #[error("network error: {0}")]
    Network(String),
    /// Body did not match the wire contract
    #[error("malformed response: {0}")]
    Malformed(String),
    /// Service answered but declined the request
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Client for the game backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            token: None,
        }
    }

    /// Attach the signed-in user's bearer token
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Build a client from the page context: default `/api` base and the
    /// auth token the login flow left in LocalStorage, if any
    #[cfg(target_arch = "wasm32")]
    pub fn from_window() -> Self {
        let token = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|s| s.get_item("token").ok())
            .flatten();
        if token.is_some() {
            log::info!("Using stored auth token");
        }
        Self::new("/api").with_token(token)
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Fetch one puzzle question from the provider proxy
    #[cfg(target_arch = "wasm32")]
    pub async fn fetch_question(&self) -> Result<Question, ApiError> {
        let url = format!("{}/banana/question", self.base);
        let body = http::get_text(&url, self.token()).await?;
        types::parse_question(&body)
    }

    /// Submit final session stats to the score service
    #[cfg(target_arch = "wasm32")]
    pub async fn submit_score(
        &self,
        submission: &ScoreSubmission,
    ) -> Result<ScoreReport, ApiError> {
        let url = format!("{}/scores", self.base);
        let body = serde_json::to_string(submission)
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        let response = http::post_text(&url, &body, self.token()).await?;
        types::parse_score_report(&response)
    }

    /// Fetch one page of the leaderboard
    #[cfg(target_arch = "wasm32")]
    pub async fn leaderboard(&self, limit: u32, page: u32) -> Result<LeaderboardPage, ApiError> {
        let url = format!("{}/scores/leaderboard?limit={limit}&page={page}", self.base);
        let body = http::get_text(&url, self.token()).await?;
        types::parse_leaderboard(&body)
    }

    /// Fetch the signed-in user's profile
    #[cfg(target_arch = "wasm32")]
    pub async fn profile(&self) -> Result<Profile, ApiError> {
        let url = format!("{}/auth/me", self.base);
        let body = http::get_text(&url, self.token()).await?;
        types::parse_profile(&body)
    }
}
