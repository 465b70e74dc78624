use crate::models::domain::ScoredApplication;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Response for a board batch recompute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecomputeResponse {
    #[serde(rename = "boardId")]
    pub board_id: Uuid,
    pub scored: usize,
    /// Application ids skipped because the profile was unreadable.
    pub skipped: Vec<Uuid>,
    /// Applications excluded by the hard pre-filter (inactive profile or
    /// gender gate); they carry no score.
    pub filtered: usize,
    #[serde(rename = "totalApplicants")]
    pub total_applicants: usize,
    #[serde(rename = "computedAt")]
    pub computed_at: chrono::DateTime<chrono::Utc>,
}

/// Response for the scored applications listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardApplicationsResponse {
    #[serde(rename = "boardId")]
    pub board_id: Uuid,
    pub applications: Vec<ScoredApplication>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
}

/// Response for a board-change invalidation
///
/// The cached scores are only marked stale; the next listing read
/// recomputes them lazily.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardInvalidateResponse {
    #[serde(rename = "boardId")]
    pub board_id: Uuid,
    #[serde(rename = "markedStale")]
    pub marked_stale: u64,
}

/// Response for a profile-change invalidation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidateResponse {
    #[serde(rename = "profileId")]
    pub profile_id: Uuid,
    /// Boards whose cached scores were recomputed.
    #[serde(rename = "recomputedBoards")]
    pub recomputed_boards: Vec<Uuid>,
    pub scored: usize,
    pub skipped: Vec<Uuid>,
}
