// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    parse_tag_list, Applicant, BoardConfig, BoardRequirement, BoardScoringWeights, Criterion,
    CriterionBreakdown, MatchBreakdown, MatchOutcome, ProfileSnapshot, ScoredApplication,
    SocialReachImportance,
};
pub use requests::{ApplicationsQuery, RecomputeRequest, ScoreRequest};
pub use responses::{
    BoardApplicationsResponse, BoardInvalidateResponse, ErrorResponse, HealthResponse,
    InvalidateResponse, RecomputeResponse,
};
