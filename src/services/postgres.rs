use crate::models::{
    parse_tag_list, Applicant, BoardConfig, BoardRequirement, BoardScoringWeights, MatchBreakdown,
    ProfileSnapshot, ScoredApplication, SocialReachImportance,
};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// PostgreSQL client for board configuration and cached match scores
///
/// The platform's relational schema owns boards, requirements, weights,
/// profiles and applications; this client reads the pieces the engine
/// needs and writes the cached `match_score` / `match_details` columns
/// back onto `board_applications` and `applications`.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, PostgresError> {
        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Load a board's requirement and weight configuration
    ///
    /// A board without a requirements or weights row gets the defaults
    /// (no constraints / mid-slider weights); a missing board is an error.
    pub async fn get_board_config(&self, board_id: Uuid) -> Result<BoardConfig, PostgresError> {
        let query = r#"
            SELECT
                b.id,
                r.min_age, r.max_age,
                r.min_height_cm, r.max_height_cm,
                r.min_bust_cm, r.max_bust_cm,
                r.min_waist_cm, r.max_waist_cm,
                r.min_hips_cm, r.max_hips_cm,
                r.genders, r.body_types, r.comfort_levels,
                r.experience_levels, r.skills, r.locations,
                r.min_social_reach, r.social_reach_importance,
                w.age_weight, w.height_weight, w.measurements_weight,
                w.body_type_weight, w.comfort_weight, w.experience_weight,
                w.skills_weight, w.location_weight, w.social_reach_weight
            FROM boards b
            LEFT JOIN board_requirements r ON r.board_id = b.id
            LEFT JOIN board_scoring_weights w ON w.board_id = b.id
            WHERE b.id = $1
        "#;

        let row = sqlx::query(query)
            .bind(board_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("board {}", board_id)))?;

        Ok(BoardConfig {
            requirement: requirement_from_row(&row),
            weights: weights_from_row(&row),
        })
    }

    /// Load every applicant on a board, with profile snapshots
    ///
    /// A board_application whose profile row is missing still comes back
    /// (with `profile: None`) so the batch can report it as skipped
    /// instead of silently dropping it.
    pub async fn get_board_applicants(
        &self,
        board_id: Uuid,
    ) -> Result<Vec<Applicant>, PostgresError> {
        let query = r#"
            SELECT
                ba.application_id,
                a.created_at,
                p.id AS profile_id,
                p.age, p.height_cm, p.bust_cm, p.waist_cm, p.hips_cm,
                p.gender, p.body_types, p.comfort_levels,
                p.experience_level, p.skills, p.city,
                p.instagram_handle, p.follower_count, p.is_active
            FROM board_applications ba
            JOIN applications a ON a.id = ba.application_id
            LEFT JOIN profiles p ON p.id = a.profile_id
            WHERE ba.board_id = $1
            ORDER BY a.created_at ASC
        "#;

        let rows = sqlx::query(query)
            .bind(board_id)
            .fetch_all(&self.pool)
            .await?;

        let applicants = rows
            .iter()
            .map(|row| Applicant {
                application_id: row.get("application_id"),
                profile: profile_from_row(row),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(applicants)
    }

    /// Persist a batch of computed scores
    ///
    /// Writes both caches in one transaction per batch: the
    /// board_applications row (score + breakdown, clearing the stale
    /// flag) and the denormalized columns on applications.
    pub async fn save_match_results(
        &self,
        board_id: Uuid,
        scored: &[ScoredApplication],
    ) -> Result<(), PostgresError> {
        let mut tx = self.pool.begin().await?;

        for result in scored {
            let details = serde_json::to_value(&result.breakdown)
                .map_err(|e| PostgresError::InvalidInput(format!("breakdown encoding: {}", e)))?;

            sqlx::query(
                r#"
                UPDATE board_applications
                SET match_score = $3,
                    match_details = $4,
                    stale = FALSE,
                    updated_at = NOW()
                WHERE board_id = $1 AND application_id = $2
                "#,
            )
            .bind(board_id)
            .bind(result.application_id)
            .bind(i16::from(result.score))
            .bind(details)
            .execute(&mut *tx)
            .await?;

            // Denormalized cache on the application itself, only for the
            // board it is currently associated with
            sqlx::query(
                r#"
                UPDATE applications
                SET match_score = $2,
                    match_calculated_at = NOW()
                WHERE id = $1 AND board_id = $3
                "#,
            )
            .bind(result.application_id)
            .bind(i16::from(result.score))
            .bind(board_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!("Persisted {} match scores for board {}", scored.len(), board_id);

        Ok(())
    }

    /// Clear cached scores for applications excluded by the hard pre-filter
    ///
    /// Inactive or gender-gated profiles carry no score at all; clearing
    /// the stale flag keeps them from re-triggering recompute on every
    /// read while the listing query leaves them out.
    pub async fn clear_match_results(
        &self,
        board_id: Uuid,
        application_ids: &[Uuid],
    ) -> Result<(), PostgresError> {
        if application_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            UPDATE board_applications
            SET match_score = NULL,
                match_details = NULL,
                stale = FALSE,
                updated_at = NOW()
            WHERE board_id = $1 AND application_id = ANY($2)
            "#,
        )
        .bind(board_id)
        .bind(application_ids)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Mark every cached score under a board stale
    ///
    /// Called when the board's requirements or weights change.
    pub async fn mark_board_stale(&self, board_id: Uuid) -> Result<u64, PostgresError> {
        let result = sqlx::query(
            r#"
            UPDATE board_applications
            SET stale = TRUE
            WHERE board_id = $1
            "#,
        )
        .bind(board_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Mark every cached score referencing a profile's applications stale
    ///
    /// Called when the profile's attributes change.
    pub async fn mark_profile_stale(&self, profile_id: Uuid) -> Result<u64, PostgresError> {
        let result = sqlx::query(
            r#"
            UPDATE board_applications ba
            SET stale = TRUE
            FROM applications a
            WHERE ba.application_id = a.id AND a.profile_id = $1
            "#,
        )
        .bind(profile_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Boards carrying applications from the given profile
    pub async fn boards_for_profile(&self, profile_id: Uuid) -> Result<Vec<Uuid>, PostgresError> {
        let query = r#"
            SELECT DISTINCT ba.board_id
            FROM board_applications ba
            JOIN applications a ON a.id = ba.application_id
            WHERE a.profile_id = $1
        "#;

        let rows = sqlx::query(query)
            .bind(profile_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("board_id")).collect())
    }

    /// Whether any cached score under a board is stale or missing
    pub async fn has_stale_scores(&self, board_id: Uuid) -> Result<bool, PostgresError> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM board_applications
                WHERE board_id = $1 AND stale
            ) AS stale
            "#,
        )
        .bind(board_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("stale"))
    }

    /// Read the full scored list for a board
    ///
    /// Ordered by (score desc, application created_at asc); rows whose
    /// score was never computed are excluded. The whole ranked list comes
    /// back so callers can cache it once and page per request. A row with
    /// an undecodable breakdown is skipped with a warning, never fails
    /// the read.
    pub async fn get_scored_applications(
        &self,
        board_id: Uuid,
    ) -> Result<Vec<ScoredApplication>, PostgresError> {
        let query = r#"
            SELECT
                ba.application_id,
                ba.match_score,
                ba.match_details,
                a.profile_id,
                a.created_at
            FROM board_applications ba
            JOIN applications a ON a.id = ba.application_id
            WHERE ba.board_id = $1 AND ba.match_score IS NOT NULL
            ORDER BY ba.match_score DESC, a.created_at ASC
        "#;

        let rows = sqlx::query(query)
            .bind(board_id)
            .fetch_all(&self.pool)
            .await?;

        let applications = rows
            .iter()
            .filter_map(|row| {
                let application_id: Uuid = row.get("application_id");
                let score: i16 = row.get("match_score");
                let details: Option<serde_json::Value> = row.get("match_details");

                let breakdown = match details.map(serde_json::from_value::<MatchBreakdown>) {
                    Some(Ok(breakdown)) => breakdown,
                    _ => {
                        tracing::warn!(
                            "Undecodable match_details for application {}, skipping",
                            application_id
                        );
                        return None;
                    }
                };

                Some(ScoredApplication {
                    application_id,
                    profile_id: row.get("profile_id"),
                    score: score.clamp(0, 100) as u8,
                    breakdown,
                    created_at: row.get("created_at"),
                })
            })
            .collect();

        Ok(applications)
    }

    /// Persist a refreshed follower count on a profile
    pub async fn update_follower_count(
        &self,
        profile_id: Uuid,
        follower_count: u64,
    ) -> Result<(), PostgresError> {
        sqlx::query(
            r#"
            UPDATE profiles
            SET follower_count = $2
            WHERE id = $1
            "#,
        )
        .bind(profile_id)
        .bind(follower_count as i64)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Decode a board_requirements row (all-NULL when the row is absent).
fn requirement_from_row(row: &PgRow) -> BoardRequirement {
    let importance: Option<String> = row.get("social_reach_importance");

    BoardRequirement {
        min_age: get_small(row, "min_age"),
        max_age: get_small(row, "max_age"),
        min_height_cm: get_medium(row, "min_height_cm"),
        max_height_cm: get_medium(row, "max_height_cm"),
        min_bust_cm: row.get("min_bust_cm"),
        max_bust_cm: row.get("max_bust_cm"),
        min_waist_cm: row.get("min_waist_cm"),
        max_waist_cm: row.get("max_waist_cm"),
        min_hips_cm: row.get("min_hips_cm"),
        max_hips_cm: row.get("max_hips_cm"),
        genders: tags(row, "genders"),
        body_types: tags(row, "body_types"),
        comfort_levels: tags(row, "comfort_levels"),
        experience_levels: tags(row, "experience_levels"),
        skills: tags(row, "skills"),
        locations: tags(row, "locations"),
        min_social_reach: get_count(row, "min_social_reach"),
        social_reach_importance: importance
            .as_deref()
            .map(SocialReachImportance::from_str_lossy)
            .unwrap_or_default(),
    }
}

/// Decode a board_scoring_weights row, defaulting each missing slider.
fn weights_from_row(row: &PgRow) -> BoardScoringWeights {
    let defaults = BoardScoringWeights::default();
    let slider = |column: &str, fallback: f64| -> f64 {
        row.get::<Option<f64>, _>(column).unwrap_or(fallback)
    };

    BoardScoringWeights {
        age: slider("age_weight", defaults.age),
        height: slider("height_weight", defaults.height),
        measurements: slider("measurements_weight", defaults.measurements),
        body_type: slider("body_type_weight", defaults.body_type),
        comfort: slider("comfort_weight", defaults.comfort),
        experience: slider("experience_weight", defaults.experience),
        skills: slider("skills_weight", defaults.skills),
        location: slider("location_weight", defaults.location),
        social_reach: slider("social_reach_weight", defaults.social_reach),
    }
}

/// Decode a profile snapshot from a LEFT-JOINed row; None when absent.
fn profile_from_row(row: &PgRow) -> Option<ProfileSnapshot> {
    let profile_id: Option<Uuid> = row.get("profile_id");
    let profile_id = profile_id?;

    Some(ProfileSnapshot {
        profile_id,
        age: get_small(row, "age"),
        height_cm: get_medium(row, "height_cm"),
        bust_cm: row.get("bust_cm"),
        waist_cm: row.get("waist_cm"),
        hips_cm: row.get("hips_cm"),
        gender: row.get("gender"),
        body_types: tags(row, "body_types"),
        comfort_levels: tags(row, "comfort_levels"),
        experience_level: row.get("experience_level"),
        skills: tags(row, "skills"),
        city: row.get("city"),
        instagram_handle: row.get("instagram_handle"),
        follower_count: get_count(row, "follower_count"),
        is_active: row.get::<Option<bool>, _>("is_active").unwrap_or(false),
    })
}

fn get_small(row: &PgRow, column: &str) -> Option<u8> {
    row.get::<Option<i16>, _>(column)
        .and_then(|v| u8::try_from(v).ok())
}

fn get_medium(row: &PgRow, column: &str) -> Option<u16> {
    row.get::<Option<i16>, _>(column)
        .and_then(|v| u16::try_from(v).ok())
}

fn get_count(row: &PgRow, column: &str) -> Option<u64> {
    row.get::<Option<i64>, _>(column)
        .and_then(|v| u64::try_from(v).ok())
}

/// JSON-as-text tag columns; malformed content decodes to an empty list.
fn tags(row: &PgRow, column: &str) -> Vec<String> {
    let raw: Option<String> = row.get(column);
    parse_tag_list(raw.as_deref())
}
