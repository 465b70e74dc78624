use crate::models::domain::{BoardConfig, ProfileSnapshot};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to score one (profile, board configuration) pair inline
///
/// Pure computation; nothing is persisted. Used by the platform to
/// preview a score while an agency edits board requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub profile: ProfileSnapshot,
    pub board: BoardConfig,
}

/// Request body for a board batch recompute
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecomputeRequest {
    /// Refresh follower counts from the social metrics API before scoring.
    #[serde(rename = "refreshSocialReach", default)]
    pub refresh_social_reach: bool,
}

/// Query parameters for the scored applications listing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplicationsQuery {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 500))]
    pub limit: u16,
}

impl Default for ApplicationsQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

fn default_limit() -> u16 {
    100
}
