use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The nine weighted criterion families, plus gender.
///
/// Gender carries a requirement field on boards but no weight slider, so it
/// can never contribute to the weighted score; it is still evaluated,
/// reported in the breakdown, and applied as a hard pre-filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Age,
    Height,
    Measurements,
    Gender,
    BodyType,
    Comfort,
    Experience,
    Skills,
    Location,
    SocialReach,
}

impl Criterion {
    /// All criteria in breakdown order.
    pub const ALL: [Criterion; 10] = [
        Criterion::Age,
        Criterion::Height,
        Criterion::Measurements,
        Criterion::Gender,
        Criterion::BodyType,
        Criterion::Comfort,
        Criterion::Experience,
        Criterion::Skills,
        Criterion::Location,
        Criterion::SocialReach,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Age => "age",
            Criterion::Height => "height",
            Criterion::Measurements => "measurements",
            Criterion::Gender => "gender",
            Criterion::BodyType => "body_type",
            Criterion::Comfort => "comfort",
            Criterion::Experience => "experience",
            Criterion::Skills => "skills",
            Criterion::Location => "location",
            Criterion::SocialReach => "social_reach",
        }
    }
}

/// Talent profile snapshot as the engine sees it
///
/// Attribute fields are optional wherever the platform allows blanks; a
/// missing value for a configured criterion scores as a non-match, never
/// as neutral.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    #[serde(rename = "profileId")]
    pub profile_id: Uuid,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(rename = "heightCm", default)]
    pub height_cm: Option<u16>,
    #[serde(rename = "bustCm", default)]
    pub bust_cm: Option<f64>,
    #[serde(rename = "waistCm", default)]
    pub waist_cm: Option<f64>,
    #[serde(rename = "hipsCm", default)]
    pub hips_cm: Option<f64>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(rename = "bodyTypes", default)]
    pub body_types: Vec<String>,
    #[serde(rename = "comfortLevels", default)]
    pub comfort_levels: Vec<String>,
    #[serde(rename = "experienceLevel", default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(rename = "instagramHandle", default)]
    pub instagram_handle: Option<String>,
    #[serde(rename = "followerCount", default)]
    pub follower_count: Option<u64>,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Importance tier for the social reach threshold
///
/// Informational metadata shown to the agency; never a scoring input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SocialReachImportance {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl SocialReachImportance {
    pub fn from_str_lossy(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "critical" => Self::Critical,
            _ => Self::None,
        }
    }
}

/// A board's requirement configuration (one row per board)
///
/// Every field is optional; an unset field means "no constraint on this
/// criterion" and must neither penalize the score nor contribute weight.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardRequirement {
    #[serde(rename = "minAge", default)]
    pub min_age: Option<u8>,
    #[serde(rename = "maxAge", default)]
    pub max_age: Option<u8>,
    #[serde(rename = "minHeightCm", default)]
    pub min_height_cm: Option<u16>,
    #[serde(rename = "maxHeightCm", default)]
    pub max_height_cm: Option<u16>,
    #[serde(rename = "minBustCm", default)]
    pub min_bust_cm: Option<f64>,
    #[serde(rename = "maxBustCm", default)]
    pub max_bust_cm: Option<f64>,
    #[serde(rename = "minWaistCm", default)]
    pub min_waist_cm: Option<f64>,
    #[serde(rename = "maxWaistCm", default)]
    pub max_waist_cm: Option<f64>,
    #[serde(rename = "minHipsCm", default)]
    pub min_hips_cm: Option<f64>,
    #[serde(rename = "maxHipsCm", default)]
    pub max_hips_cm: Option<f64>,
    #[serde(default)]
    pub genders: Vec<String>,
    #[serde(rename = "bodyTypes", default)]
    pub body_types: Vec<String>,
    #[serde(rename = "comfortLevels", default)]
    pub comfort_levels: Vec<String>,
    #[serde(rename = "experienceLevels", default)]
    pub experience_levels: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(rename = "minSocialReach", default)]
    pub min_social_reach: Option<u64>,
    #[serde(rename = "socialReachImportance", default)]
    pub social_reach_importance: SocialReachImportance,
}

/// Per-criterion weight sliders (0-5 scale)
///
/// A weight of 0 excludes the criterion from the score entirely, even when
/// a requirement is configured for it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoardScoringWeights {
    pub age: f64,
    pub height: f64,
    pub measurements: f64,
    #[serde(rename = "bodyType")]
    pub body_type: f64,
    pub comfort: f64,
    pub experience: f64,
    pub skills: f64,
    pub location: f64,
    #[serde(rename = "socialReach")]
    pub social_reach: f64,
}

impl Default for BoardScoringWeights {
    /// Mid-slider on every family, matching the platform's board creation
    /// form defaults.
    fn default() -> Self {
        Self {
            age: 3.0,
            height: 3.0,
            measurements: 3.0,
            body_type: 3.0,
            comfort: 3.0,
            experience: 3.0,
            skills: 3.0,
            location: 3.0,
            social_reach: 3.0,
        }
    }
}

impl BoardScoringWeights {
    /// Weight for a criterion, clamped to [0, 5] against data corruption.
    ///
    /// Gender has no slider and always weighs 0.
    pub fn weight_for(&self, criterion: Criterion) -> f64 {
        let raw = match criterion {
            Criterion::Age => self.age,
            Criterion::Height => self.height,
            Criterion::Measurements => self.measurements,
            Criterion::Gender => 0.0,
            Criterion::BodyType => self.body_type,
            Criterion::Comfort => self.comfort,
            Criterion::Experience => self.experience,
            Criterion::Skills => self.skills,
            Criterion::Location => self.location,
            Criterion::SocialReach => self.social_reach,
        };
        if raw.is_finite() {
            raw.clamp(0.0, 5.0)
        } else {
            0.0
        }
    }
}

/// Requirement + weights pair for one board
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    pub requirement: BoardRequirement,
    pub weights: BoardScoringWeights,
}

/// One criterion's contribution to a match score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionBreakdown {
    pub criterion: Criterion,
    /// Whether the board configured a requirement for this criterion.
    pub configured: bool,
    /// Configured AND weight > 0; only active criteria enter the average.
    pub active: bool,
    pub weight: f64,
    pub satisfaction: f64,
    pub contribution: f64,
}

/// Structured explanation of how a match score was derived
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    #[serde(rename = "noActiveCriteria")]
    pub no_active_criteria: bool,
    pub criteria: Vec<CriterionBreakdown>,
}

/// Result of scoring one profile against one board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutcome {
    #[serde(rename = "matchScore")]
    pub score: u8,
    #[serde(rename = "matchDetails")]
    pub breakdown: MatchBreakdown,
}

/// One application queued for batch scoring
#[derive(Debug, Clone)]
pub struct Applicant {
    pub application_id: Uuid,
    /// None when the profile row was unreadable; such pairs are skipped
    /// and reported, never aborting the batch.
    pub profile: Option<ProfileSnapshot>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Scored application ready to persist / return
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredApplication {
    #[serde(rename = "applicationId")]
    pub application_id: Uuid,
    #[serde(rename = "profileId")]
    pub profile_id: Uuid,
    #[serde(rename = "matchScore")]
    pub score: u8,
    #[serde(rename = "matchDetails")]
    pub breakdown: MatchBreakdown,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Decode a JSON-as-text tag column into a tag list
///
/// Malformed or non-array JSON decodes to an empty list so a corrupt
/// column inactivates the criterion instead of failing the batch.
pub fn parse_tag_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(tags) => tags,
        Err(e) => {
            tracing::warn!("Malformed tag column ({}), treating as empty: {}", raw, e);
            Vec::new()
        }
    }
}
