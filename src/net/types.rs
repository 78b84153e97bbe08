//! Wire types for the external services
//!
//! The backend wraps every payload in a `{success, data}` envelope. Parsing
//! is tolerant where the contract allows it and fails with
//! [`ApiError::Malformed`](super::ApiError::Malformed) where it does not: a
//! question without an integer solution is a failure, not a panic.

use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::sim::SessionStats;

/// Backend response envelope
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwrap the envelope, mapping a rejected or empty response to an error
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| "request rejected".into()),
            ));
        }
        self.data
            .ok_or_else(|| ApiError::Malformed("missing data field".into()))
    }
}

/// One puzzle question from the provider
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Question {
    /// Prompt asset reference (an image URL)
    #[serde(rename = "question")]
    pub prompt: String,
    /// Expected integer answer
    pub solution: i64,
}

/// Parse a question response body. Missing or mistyped fields are a failure
/// the challenge resolves around, never a hang.
pub fn parse_question(body: &str) -> Result<Question, ApiError> {
    let envelope: Envelope<Question> =
        serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()))?;
    let question = envelope.into_data()?;
    if question.prompt.is_empty() {
        return Err(ApiError::Malformed("empty question prompt".into()));
    }
    Ok(question)
}

/// Final stats posted to the score service
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub score: u64,
    pub bananas_collected: u32,
    pub lives_used: u8,
    pub game_level: u32,
    pub game_duration: u64,
}

impl From<SessionStats> for ScoreSubmission {
    fn from(stats: SessionStats) -> Self {
        Self {
            score: stats.score,
            bananas_collected: stats.bananas_collected,
            lives_used: stats.lives_used,
            game_level: stats.level,
            game_duration: stats.duration_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreData {
    #[serde(default)]
    is_new_high_score: bool,
    #[serde(default)]
    current_high_score: u64,
}

/// What the score service said about a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreReport {
    pub accepted: bool,
    pub is_new_high_score: bool,
    pub current_high_score: u64,
}

/// Parse a score submission response body
pub fn parse_score_report(body: &str) -> Result<ScoreReport, ApiError> {
    let envelope: Envelope<ScoreData> =
        serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()))?;
    let accepted = envelope.success;
    let data = envelope.into_data()?;
    Ok(ScoreReport {
        accepted,
        is_new_high_score: data.is_new_high_score,
        current_high_score: data.current_high_score,
    })
}

/// One leaderboard row
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u64,
    #[serde(default)]
    pub game_level: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub limit: u32,
}

/// One page of the leaderboard
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardPage {
    pub scores: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Parse a leaderboard response body
pub fn parse_leaderboard(body: &str) -> Result<LeaderboardPage, ApiError> {
    let envelope: Envelope<LeaderboardPage> =
        serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()))?;
    envelope.into_data()
}

/// The signed-in player's profile, as served by the auth service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub highest_score: u64,
    #[serde(default)]
    pub games_played: u32,
}

/// Parse a profile response body
pub fn parse_profile(body: &str) -> Result<Profile, ApiError> {
    let envelope: Envelope<Profile> =
        serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()))?;
    envelope.into_data()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_parses_from_envelope() {
        let body = r#"{"success": true, "data": {"question": "https://example.com/q.png", "solution": 4}}"#;
        let q = parse_question(body).unwrap();
        assert_eq!(q.prompt, "https://example.com/q.png");
        assert_eq!(q.solution, 4);
    }

    #[test]
    fn question_with_non_integer_solution_is_malformed() {
        let body = r#"{"success": true, "data": {"question": "https://example.com/q.png", "solution": "four"}}"#;
        assert!(matches!(parse_question(body), Err(ApiError::Malformed(_))));
    }

    #[test]
    fn question_with_missing_fields_is_malformed() {
        let body = r#"{"success": true, "data": {"solution": 4}}"#;
        assert!(matches!(parse_question(body), Err(ApiError::Malformed(_))));

        let body = r#"{"success": true}"#;
        assert!(matches!(parse_question(body), Err(ApiError::Malformed(_))));
    }

    #[test]
    fn rejected_envelope_surfaces_the_message() {
        let body = r#"{"success": false, "message": "Failed to fetch banana question"}"#;
        match parse_question(body) {
            Err(ApiError::Rejected(msg)) => assert!(msg.contains("banana")),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn garbage_body_is_malformed() {
        assert!(matches!(
            parse_question("<html>502</html>"),
            Err(ApiError::Malformed(_))
        ));
    }

    #[test]
    fn score_report_reads_high_score_fields() {
        let body = r#"{"success": true, "data": {"score": 120, "isNewHighScore": true, "currentHighScore": 120}}"#;
        let report = parse_score_report(body).unwrap();
        assert!(report.accepted);
        assert!(report.is_new_high_score);
        assert_eq!(report.current_high_score, 120);
    }

    #[test]
    fn submission_uses_backend_field_names() {
        let stats = SessionStats {
            score: 240,
            bananas_collected: 20,
            lives_used: 3,
            level: 4,
            duration_secs: 95,
        };
        let json = serde_json::to_string(&ScoreSubmission::from(stats)).unwrap();
        assert!(json.contains("\"bananasCollected\":20"));
        assert!(json.contains("\"livesUsed\":3"));
        assert!(json.contains("\"gameLevel\":4"));
        assert!(json.contains("\"gameDuration\":95"));
    }

    #[test]
    fn leaderboard_parses_rows_and_pagination() {
        let body = r#"{"success": true, "data": {"scores": [{"username": "kai", "score": 300}], "pagination": {"total": 1, "page": 1, "pages": 1, "limit": 50}}}"#;
        let page = parse_leaderboard(body).unwrap();
        assert_eq!(page.scores.len(), 1);
        assert_eq!(page.scores[0].username, "kai");
        assert_eq!(page.pagination.total, 1);
    }
}
