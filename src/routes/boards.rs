use crate::core::{passes_prefilter, MatchEngine};
use crate::models::{
    ApplicationsQuery, BoardApplicationsResponse, BoardInvalidateResponse, ErrorResponse,
    HealthResponse, InvalidateResponse, RecomputeRequest, RecomputeResponse, ScoreRequest,
    ScoredApplication,
};
use crate::services::{CacheKey, CacheManager, PostgresClient, PostgresError, SocialReachClient};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<CacheManager>,
    /// Absent when no social metrics API is configured; recompute then
    /// scores against the stored follower counts.
    pub social: Option<Arc<SocialReachClient>>,
    pub engine: MatchEngine,
}

/// Configure all board-scoring routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/score", web::post().to(score_inline))
        .route(
            "/boards/{board_id}/recompute",
            web::post().to(recompute_board),
        )
        .route(
            "/boards/{board_id}/applications",
            web::get().to(list_applications),
        )
        .route(
            "/boards/{board_id}/invalidate",
            web::post().to(invalidate_board),
        )
        .route(
            "/profiles/{profile_id}/invalidate",
            web::post().to(invalidate_profile),
        );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Score one inline (profile, board configuration) pair
///
/// POST /api/v1/score
///
/// Pure computation: nothing is read from or written to the database.
/// The platform uses this to preview scores while an agency edits a
/// board's requirements.
async fn score_inline(
    state: web::Data<AppState>,
    req: web::Json<ScoreRequest>,
) -> impl Responder {
    let outcome = state.engine.score(&req.profile, &req.board);
    HttpResponse::Ok().json(outcome)
}

/// Recompute all cached scores on a board
///
/// POST /api/v1/boards/{board_id}/recompute
///
/// Triggered by the platform when the board's requirements or weights
/// change. Body: `{"refreshSocialReach": bool}`.
async fn recompute_board(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<RecomputeRequest>,
) -> impl Responder {
    let board_id = path.into_inner();

    match run_board_recompute(&state, board_id, req.refresh_social_reach).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => postgres_error_response(&e, &format!("recompute for board {}", board_id)),
    }
}

/// List a board's applications sorted by cached match score
///
/// GET /api/v1/boards/{board_id}/applications?limit=N
///
/// Stale rows are recomputed before the listing is served, so staleness
/// is never silently returned as fresh.
async fn list_applications(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<ApplicationsQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let board_id = path.into_inner();
    let limit = query.limit as usize;

    let stale = match state.postgres.has_stale_scores(board_id).await {
        Ok(stale) => stale,
        Err(e) => return postgres_error_response(&e, &format!("staleness check for {}", board_id)),
    };

    if stale {
        tracing::debug!("Board {} has stale scores, recomputing before listing", board_id);
        if let Err(e) = run_board_recompute(&state, board_id, false).await {
            return postgres_error_response(&e, &format!("lazy recompute for board {}", board_id));
        }
    } else {
        // Fresh board: the cached listing is safe to serve. The cache holds
        // the full ranked list; the limit only applies per request.
        let key = CacheKey::scored_applications(board_id);
        match state.cache.get::<Vec<ScoredApplication>>(&key).await {
            Ok(Some(applications)) => {
                return HttpResponse::Ok().json(listing_response(board_id, applications, limit));
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Cache read failed for board {}: {}", board_id, e),
        }
    }

    let applications = match state.postgres.get_scored_applications(board_id).await {
        Ok(applications) => applications,
        Err(e) => return postgres_error_response(&e, &format!("listing for board {}", board_id)),
    };

    let key = CacheKey::scored_applications(board_id);
    if let Err(e) = state.cache.put(&key, &applications).await {
        tracing::warn!("Cache write failed for board {}: {}", board_id, e);
    }

    HttpResponse::Ok().json(listing_response(board_id, applications, limit))
}

/// Page the full ranked list down to the requested limit.
///
/// `total_results` always reports the board's full scored count, not the
/// page size, so clients can tell a short board from a short page.
fn listing_response(
    board_id: Uuid,
    mut applications: Vec<ScoredApplication>,
    limit: usize,
) -> BoardApplicationsResponse {
    let total_results = applications.len();
    applications.truncate(limit);

    BoardApplicationsResponse {
        board_id,
        total_results,
        applications,
    }
}

/// Mark a board's cached scores stale without recomputing them
///
/// POST /api/v1/boards/{board_id}/invalidate
///
/// Triggered when the board's requirements or weights change and the
/// platform does not need fresh scores immediately. The next listing
/// read picks the stale rows up and recomputes them lazily; the
/// immediate alternative is `/recompute`.
async fn invalidate_board(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let board_id = path.into_inner();

    let marked_stale = match state.postgres.mark_board_stale(board_id).await {
        Ok(count) => count,
        Err(e) => {
            return postgres_error_response(&e, &format!("invalidation for board {}", board_id))
        }
    };

    if let Err(e) = state.cache.invalidate_board(board_id).await {
        tracing::warn!("Cache invalidation failed for board {}: {}", board_id, e);
    }

    tracing::info!("Marked {} cached scores stale for board {}", marked_stale, board_id);

    HttpResponse::Ok().json(BoardInvalidateResponse {
        board_id,
        marked_stale,
    })
}

/// Recompute every cached score affected by a profile change
///
/// POST /api/v1/profiles/{profile_id}/invalidate
///
/// Triggered by the platform's profile-edit flow. Marks affected rows
/// stale, then recomputes each board the profile has applied to.
async fn invalidate_profile(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let profile_id = path.into_inner();

    if let Err(e) = state.postgres.mark_profile_stale(profile_id).await {
        return postgres_error_response(&e, &format!("invalidation for profile {}", profile_id));
    }

    let boards = match state.postgres.boards_for_profile(profile_id).await {
        Ok(boards) => boards,
        Err(e) => {
            return postgres_error_response(&e, &format!("board lookup for profile {}", profile_id))
        }
    };

    let mut scored = 0;
    let mut skipped = Vec::new();
    let mut recomputed_boards = Vec::new();

    for board_id in boards {
        match run_board_recompute(&state, board_id, false).await {
            Ok(summary) => {
                scored += summary.scored;
                skipped.extend(summary.skipped);
                recomputed_boards.push(board_id);
            }
            // One failing board must not abort the rest of the fan-out
            Err(e) => {
                tracing::error!(
                    "Recompute failed for board {} during profile {} invalidation: {}",
                    board_id,
                    profile_id,
                    e
                );
            }
        }
    }

    tracing::info!(
        "Profile {} invalidation recomputed {} boards ({} scores)",
        profile_id,
        recomputed_boards.len(),
        scored
    );

    HttpResponse::Ok().json(InvalidateResponse {
        profile_id,
        recomputed_boards,
        scored,
        skipped,
    })
}

/// Shared recompute pipeline: load config + applicants, optionally
/// refresh follower counts, pre-filter, score, persist, invalidate cache.
async fn run_board_recompute(
    state: &AppState,
    board_id: Uuid,
    refresh_social_reach: bool,
) -> Result<RecomputeResponse, PostgresError> {
    let board = state.postgres.get_board_config(board_id).await?;
    let mut applicants = state.postgres.get_board_applicants(board_id).await?;

    if refresh_social_reach {
        if let Some(social) = &state.social {
            let refreshed = social.refresh_applicants(&mut applicants).await;
            for profile_id in &refreshed {
                if let Some(count) = applicants.iter().find_map(|a| {
                    a.profile
                        .as_ref()
                        .filter(|p| p.profile_id == *profile_id)
                        .and_then(|p| p.follower_count)
                }) {
                    if let Err(e) = state.postgres.update_follower_count(*profile_id, count).await
                    {
                        tracing::warn!(
                            "Failed to persist refreshed follower count for {}: {}",
                            profile_id,
                            e
                        );
                    }
                }
            }
            tracing::debug!(
                "Refreshed follower counts for {} profiles on board {}",
                refreshed.len(),
                board_id
            );
        } else {
            tracing::warn!("Social reach refresh requested but no social metrics API configured");
        }
    }

    // Hard pre-filter: inactive profiles and the gender gate. Excluded
    // applications carry no score and never appear in the ranked list.
    let (eligible, excluded): (Vec<_>, Vec<_>) = applicants.into_iter().partition(|a| {
        a.profile
            .as_ref()
            .map(|p| passes_prefilter(p, &board.requirement))
            // Unreadable profiles stay in so the batch reports them
            .unwrap_or(true)
    });

    let filtered_ids: Vec<Uuid> = excluded.iter().map(|a| a.application_id).collect();
    let total_applicants = eligible.len() + excluded.len();

    let result = state.engine.score_batch(&board, eligible);

    state
        .postgres
        .save_match_results(board_id, &result.scored)
        .await?;
    state
        .postgres
        .clear_match_results(board_id, &filtered_ids)
        .await?;

    if let Err(e) = state.cache.invalidate_board(board_id).await {
        tracing::warn!("Cache invalidation failed for board {}: {}", board_id, e);
    }

    tracing::info!(
        "Recomputed board {}: {} scored, {} skipped, {} filtered (of {})",
        board_id,
        result.scored.len(),
        result.skipped.len(),
        filtered_ids.len(),
        total_applicants
    );

    Ok(RecomputeResponse {
        board_id,
        scored: result.scored.len(),
        skipped: result.skipped,
        filtered: filtered_ids.len(),
        total_applicants,
        computed_at: chrono::Utc::now(),
    })
}

fn postgres_error_response(error: &PostgresError, context: &str) -> HttpResponse {
    match error {
        PostgresError::NotFound(what) => {
            tracing::info!("Not found during {}: {}", context, what);
            HttpResponse::NotFound().json(ErrorResponse {
                error: "Not found".to_string(),
                message: what.clone(),
                status_code: 404,
            })
        }
        other => {
            tracing::error!("Database error during {}: {}", context, other);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Database error".to_string(),
                message: other.to_string(),
                status_code: 500,
            })
        }
    }
}
