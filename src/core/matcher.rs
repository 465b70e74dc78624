use crate::core::{
    evaluator::{evaluate_profile, EvaluatorConfig},
    scoring::calculate_match_score,
};
use crate::models::{Applicant, BoardConfig, MatchOutcome, ProfileSnapshot, ScoredApplication};
use uuid::Uuid;

/// Result of scoring a batch of applications against one board
#[derive(Debug)]
pub struct BatchResult {
    /// Scored applications, sorted by (score desc, created_at asc).
    pub scored: Vec<ScoredApplication>,
    /// Application ids skipped because the profile was unreadable.
    pub skipped: Vec<Uuid>,
    pub total_applicants: usize,
}

/// Stateless scoring engine for (profile, board) pairs
///
/// Pure computation: no I/O and no shared mutable state, so a single
/// engine can be called concurrently from any number of workers. Each
/// pair is scored independently; the caller owns serializing writes of
/// the cached score per row.
#[derive(Debug, Clone, Copy)]
pub struct MatchEngine {
    config: EvaluatorConfig,
}

impl MatchEngine {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self {
            config: EvaluatorConfig::default(),
        }
    }

    /// Score one profile against one board configuration
    ///
    /// Deterministic: the same snapshot and configuration always yield
    /// the same score and breakdown.
    pub fn score(&self, profile: &ProfileSnapshot, board: &BoardConfig) -> MatchOutcome {
        let evaluations = evaluate_profile(profile, &board.requirement, &self.config);
        let (score, breakdown) = calculate_match_score(&evaluations, &board.weights);

        MatchOutcome { score, breakdown }
    }

    /// Score every applicant on a board
    ///
    /// Pairs with an unreadable profile are skipped and reported; one bad
    /// row never aborts the batch. The final ordering (score desc, then
    /// application created_at asc) is applied only after all scores are
    /// available, so it is stable across recomputations.
    pub fn score_batch(&self, board: &BoardConfig, applicants: Vec<Applicant>) -> BatchResult {
        let total_applicants = applicants.len();
        let mut skipped = Vec::new();

        let mut scored: Vec<ScoredApplication> = applicants
            .into_iter()
            .filter_map(|applicant| {
                let Some(profile) = applicant.profile else {
                    tracing::warn!(
                        "Skipping application {}: profile unreadable",
                        applicant.application_id
                    );
                    skipped.push(applicant.application_id);
                    return None;
                };

                let outcome = self.score(&profile, board);

                Some(ScoredApplication {
                    application_id: applicant.application_id,
                    profile_id: profile.profile_id,
                    score: outcome.score,
                    breakdown: outcome.breakdown,
                    created_at: applicant.created_at,
                })
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });

        BatchResult {
            scored,
            skipped,
            total_applicants,
        }
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoardRequirement, BoardScoringWeights};
    use chrono::{Duration, Utc};

    fn profile(height_cm: u16, skills: &[&str]) -> ProfileSnapshot {
        ProfileSnapshot {
            profile_id: Uuid::new_v4(),
            age: Some(25),
            height_cm: Some(height_cm),
            bust_cm: None,
            waist_cm: None,
            hips_cm: None,
            gender: Some("female".to_string()),
            body_types: vec![],
            comfort_levels: vec![],
            experience_level: None,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            city: None,
            instagram_handle: None,
            follower_count: None,
            is_active: true,
        }
    }

    fn height_only_board() -> BoardConfig {
        let mut requirement = BoardRequirement::default();
        requirement.min_height_cm = Some(170);
        requirement.max_height_cm = Some(185);

        let weights = BoardScoringWeights {
            age: 0.0,
            height: 5.0,
            measurements: 0.0,
            body_type: 0.0,
            comfort: 0.0,
            experience: 0.0,
            skills: 0.0,
            location: 0.0,
            social_reach: 0.0,
        };

        BoardConfig {
            requirement,
            weights,
        }
    }

    fn applicant(profile: Option<ProfileSnapshot>, age_offset_secs: i64) -> Applicant {
        Applicant {
            application_id: Uuid::new_v4(),
            profile,
            created_at: Utc::now() - Duration::seconds(age_offset_secs),
        }
    }

    #[test]
    fn test_height_in_range_scores_100() {
        let engine = MatchEngine::with_defaults();
        let outcome = engine.score(&profile(177, &[]), &height_only_board());
        assert_eq!(outcome.score, 100);
    }

    #[test]
    fn test_height_far_below_range_scores_0() {
        // 160 vs 170-185: distance 10 well past the falloff window
        let engine = MatchEngine::with_defaults();
        let outcome = engine.score(&profile(160, &[]), &height_only_board());
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn test_skills_only_board_no_intersection_scores_0() {
        let mut requirement = BoardRequirement::default();
        requirement.skills = vec!["runway".to_string(), "editorial".to_string()];

        let weights = BoardScoringWeights {
            age: 0.0,
            height: 0.0,
            measurements: 0.0,
            body_type: 0.0,
            comfort: 0.0,
            experience: 0.0,
            skills: 3.0,
            location: 0.0,
            social_reach: 0.0,
        };

        let board = BoardConfig {
            requirement,
            weights,
        };

        let engine = MatchEngine::with_defaults();
        let outcome = engine.score(&profile(175, &["commercial"]), &board);
        assert_eq!(outcome.score, 0);
        assert!(!outcome.breakdown.no_active_criteria);
    }

    #[test]
    fn test_unconfigured_board_scores_0_with_flag() {
        let board = BoardConfig::default();
        let engine = MatchEngine::with_defaults();
        let outcome = engine.score(&profile(175, &[]), &board);
        assert_eq!(outcome.score, 0);
        assert!(outcome.breakdown.no_active_criteria);
    }

    #[test]
    fn test_batch_sorted_by_score_then_created_at() {
        let engine = MatchEngine::with_defaults();
        let board = height_only_board();

        let older_perfect = applicant(Some(profile(177, &[])), 3600);
        let newer_perfect = applicant(Some(profile(180, &[])), 60);
        let partial = applicant(Some(profile(169, &[])), 0);

        let older_id = older_perfect.application_id;
        let newer_id = newer_perfect.application_id;

        let result = engine.score_batch(
            &board,
            vec![newer_perfect, partial, older_perfect],
        );

        assert_eq!(result.total_applicants, 3);
        assert_eq!(result.scored.len(), 3);
        // Both perfect scores tie at 100; the older application wins
        assert_eq!(result.scored[0].application_id, older_id);
        assert_eq!(result.scored[1].application_id, newer_id);
        assert!(result.scored[2].score < 100);
    }

    #[test]
    fn test_batch_skips_unreadable_profiles() {
        let engine = MatchEngine::with_defaults();
        let board = height_only_board();

        let broken = applicant(None, 0);
        let broken_id = broken.application_id;
        let ok = applicant(Some(profile(177, &[])), 0);

        let result = engine.score_batch(&board, vec![broken, ok]);

        assert_eq!(result.scored.len(), 1);
        assert_eq!(result.skipped, vec![broken_id]);
        assert_eq!(result.total_applicants, 2);
    }

    #[test]
    fn test_dominating_profile_ranks_at_least_as_high() {
        let engine = MatchEngine::with_defaults();

        let mut requirement = BoardRequirement::default();
        requirement.min_height_cm = Some(170);
        requirement.max_height_cm = Some(185);
        requirement.skills = vec!["runway".to_string()];
        let board = BoardConfig {
            requirement,
            weights: BoardScoringWeights::default(),
        };

        let dominating = engine.score(&profile(177, &["runway"]), &board);
        let dominated = engine.score(&profile(169, &["runway"]), &board);
        assert!(dominating.score >= dominated.score);
    }

    #[test]
    fn test_score_is_reproducible() {
        let engine = MatchEngine::with_defaults();
        let board = height_only_board();
        let p = profile(172, &["runway"]);

        let first = engine.score(&p, &board);
        let second = engine.score(&p, &board);
        assert_eq!(first.score, second.score);
        assert_eq!(first.breakdown, second.breakdown);
    }
}
