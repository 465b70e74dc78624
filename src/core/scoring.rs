use crate::core::evaluator::CriterionEvaluation;
use crate::models::{BoardScoringWeights, CriterionBreakdown, MatchBreakdown};

/// Combine per-criterion satisfactions into a 0-100 match score
///
/// A criterion is active iff the board configured a requirement for it AND
/// its weight slider is above zero. The score is the weighted average of
/// active satisfactions scaled to 100, so scores stay comparable across
/// boards with different total weight budgets:
///
/// ```text
/// score = round(100 * sum(w_i * s_i) / sum(w_i))    over active criteria
/// ```
///
/// With no active criteria the score is 0 and the breakdown carries an
/// explicit `no_active_criteria` flag. The breakdown always retains every
/// criterion, active or not, so the agency UI can explain why a score is
/// what it is.
pub fn calculate_match_score(
    evaluations: &[CriterionEvaluation],
    weights: &BoardScoringWeights,
) -> (u8, MatchBreakdown) {
    let mut weight_sum = 0.0;
    let mut weighted_satisfaction = 0.0;

    let mut criteria: Vec<CriterionBreakdown> = evaluations
        .iter()
        .map(|eval| {
            let weight = weights.weight_for(eval.criterion);
            let active = eval.configured && weight > 0.0;

            if active {
                weight_sum += weight;
                weighted_satisfaction += weight * eval.satisfaction;
            }

            CriterionBreakdown {
                criterion: eval.criterion,
                configured: eval.configured,
                active,
                weight,
                satisfaction: eval.satisfaction,
                contribution: 0.0,
            }
        })
        .collect();

    if weight_sum <= 0.0 {
        return (
            0,
            MatchBreakdown {
                no_active_criteria: true,
                criteria,
            },
        );
    }

    // Contribution is each criterion's share of the final 0-100 score
    for entry in criteria.iter_mut() {
        if entry.active {
            entry.contribution = 100.0 * entry.weight * entry.satisfaction / weight_sum;
        }
    }

    let raw = 100.0 * weighted_satisfaction / weight_sum;
    // Round half-up, then clamp against floating-point overshoot
    let score = raw.round().clamp(0.0, 100.0) as u8;

    (
        score,
        MatchBreakdown {
            no_active_criteria: false,
            criteria,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Criterion;

    fn zero_weights() -> BoardScoringWeights {
        BoardScoringWeights {
            age: 0.0,
            height: 0.0,
            measurements: 0.0,
            body_type: 0.0,
            comfort: 0.0,
            experience: 0.0,
            skills: 0.0,
            location: 0.0,
            social_reach: 0.0,
        }
    }

    fn eval(criterion: Criterion, configured: bool, satisfaction: f64) -> CriterionEvaluation {
        CriterionEvaluation {
            criterion,
            configured,
            satisfaction,
        }
    }

    fn unconfigured_evals() -> Vec<CriterionEvaluation> {
        Criterion::ALL
            .iter()
            .map(|&c| eval(c, false, 0.0))
            .collect()
    }

    #[test]
    fn test_no_requirements_scores_zero() {
        let (score, breakdown) =
            calculate_match_score(&unconfigured_evals(), &BoardScoringWeights::default());
        assert_eq!(score, 0);
        assert!(breakdown.no_active_criteria);
        assert_eq!(breakdown.criteria.len(), Criterion::ALL.len());
    }

    #[test]
    fn test_all_weights_zero_scores_zero() {
        let mut evals = unconfigured_evals();
        evals[0] = eval(Criterion::Age, true, 1.0);

        let (score, breakdown) = calculate_match_score(&evals, &zero_weights());
        assert_eq!(score, 0);
        assert!(breakdown.no_active_criteria);
    }

    #[test]
    fn test_perfect_satisfaction_scores_100() {
        let mut evals = unconfigured_evals();
        evals[0] = eval(Criterion::Age, true, 1.0);
        evals[7] = eval(Criterion::Skills, true, 1.0);

        let (score, breakdown) =
            calculate_match_score(&evals, &BoardScoringWeights::default());
        assert_eq!(score, 100);
        assert!(!breakdown.no_active_criteria);
    }

    #[test]
    fn test_weighted_average_not_weighted_sum() {
        // Height fully satisfied at weight 5, skills missed at weight 5:
        // average is 50 regardless of the total weight budget.
        let mut evals = unconfigured_evals();
        evals[1] = eval(Criterion::Height, true, 1.0);
        evals[7] = eval(Criterion::Skills, true, 0.0);

        let weights = BoardScoringWeights {
            height: 5.0,
            skills: 5.0,
            ..zero_weights()
        };

        let (score, _) = calculate_match_score(&evals, &weights);
        assert_eq!(score, 50);

        let halved = BoardScoringWeights {
            height: 2.5,
            skills: 2.5,
            ..zero_weights()
        };
        let (score_halved, _) = calculate_match_score(&evals, &halved);
        assert_eq!(score_halved, 50);
    }

    #[test]
    fn test_zero_weight_excludes_configured_criterion() {
        // Skills configured but slider at 0: a total miss must not drag
        // the score down.
        let mut evals = unconfigured_evals();
        evals[1] = eval(Criterion::Height, true, 1.0);
        evals[7] = eval(Criterion::Skills, true, 0.0);

        let weights = BoardScoringWeights {
            height: 4.0,
            ..zero_weights()
        };

        let (score, breakdown) = calculate_match_score(&evals, &weights);
        assert_eq!(score, 100);

        let skills = breakdown
            .criteria
            .iter()
            .find(|c| c.criterion == Criterion::Skills)
            .unwrap();
        assert!(skills.configured);
        assert!(!skills.active);
        assert_eq!(skills.contribution, 0.0);
    }

    #[test]
    fn test_gender_never_weight_bearing() {
        let mut evals = unconfigured_evals();
        evals[1] = eval(Criterion::Height, true, 1.0);
        // Gender configured and missed; it has no slider so the score
        // must remain 100.
        evals[3] = eval(Criterion::Gender, true, 0.0);

        let weights = BoardScoringWeights {
            height: 3.0,
            ..zero_weights()
        };

        let (score, breakdown) = calculate_match_score(&evals, &weights);
        assert_eq!(score, 100);

        let gender = breakdown
            .criteria
            .iter()
            .find(|c| c.criterion == Criterion::Gender)
            .unwrap();
        assert!(gender.configured);
        assert!(!gender.active);
        assert_eq!(gender.weight, 0.0);
    }

    #[test]
    fn test_rounding_half_up() {
        // Two criteria, satisfactions 1.0 and 0.75 at weights 1 and 3:
        // raw = 100 * (1 + 2.25) / 4 = 81.25 -> 81
        let mut evals = unconfigured_evals();
        evals[0] = eval(Criterion::Age, true, 1.0);
        evals[1] = eval(Criterion::Height, true, 0.75);

        let weights = BoardScoringWeights {
            age: 1.0,
            height: 3.0,
            ..zero_weights()
        };

        let (score, _) = calculate_match_score(&evals, &weights);
        assert_eq!(score, 81);

        // raw = 100 * (1 * 0.505) / 1 = 50.5 -> rounds up to 51
        let mut evals = unconfigured_evals();
        evals[0] = eval(Criterion::Age, true, 0.505);
        let weights = BoardScoringWeights {
            age: 1.0,
            ..zero_weights()
        };
        let (score, _) = calculate_match_score(&evals, &weights);
        assert_eq!(score, 51);
    }

    #[test]
    fn test_contributions_sum_to_score() {
        let mut evals = unconfigured_evals();
        evals[0] = eval(Criterion::Age, true, 0.8);
        evals[1] = eval(Criterion::Height, true, 0.4);
        evals[7] = eval(Criterion::Skills, true, 1.0);

        let weights = BoardScoringWeights {
            age: 2.0,
            height: 4.0,
            skills: 1.5,
            ..zero_weights()
        };

        let (score, breakdown) = calculate_match_score(&evals, &weights);
        let total: f64 = breakdown.criteria.iter().map(|c| c.contribution).sum();
        assert!((total - score as f64).abs() <= 0.5);
    }

    #[test]
    fn test_order_invariance() {
        let mut evals = unconfigured_evals();
        evals[0] = eval(Criterion::Age, true, 0.3);
        evals[1] = eval(Criterion::Height, true, 0.9);
        evals[7] = eval(Criterion::Skills, true, 0.6);

        let weights = BoardScoringWeights::default();
        let (forward, _) = calculate_match_score(&evals, &weights);

        evals.reverse();
        let (reversed, _) = calculate_match_score(&evals, &weights);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_monotonic_in_satisfaction() {
        let weights = BoardScoringWeights::default();

        let mut evals = unconfigured_evals();
        evals[0] = eval(Criterion::Age, true, 0.2);
        evals[7] = eval(Criterion::Skills, true, 0.5);
        let (lower, _) = calculate_match_score(&evals, &weights);

        evals[0] = eval(Criterion::Age, true, 0.9);
        let (higher, _) = calculate_match_score(&evals, &weights);

        assert!(higher >= lower);
    }

    #[test]
    fn test_idempotent() {
        let mut evals = unconfigured_evals();
        evals[0] = eval(Criterion::Age, true, 0.37);
        evals[7] = eval(Criterion::Skills, true, 0.81);

        let weights = BoardScoringWeights::default();
        let (score_a, breakdown_a) = calculate_match_score(&evals, &weights);
        let (score_b, breakdown_b) = calculate_match_score(&evals, &weights);

        assert_eq!(score_a, score_b);
        assert_eq!(breakdown_a, breakdown_b);
    }
}
