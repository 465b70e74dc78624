use crate::models::{BoardRequirement, Criterion, ProfileSnapshot};

/// Tolerance constants for range falloff
///
/// The falloff window outside a configured range is
/// `max(tolerance_fraction * (max - min), min_tolerance)`; a degenerate
/// range (single bound, or min == max) falls back to `min_tolerance`.
/// These are deliberately configuration, not hardcoded policy.
#[derive(Debug, Clone, Copy)]
pub struct EvaluatorConfig {
    pub tolerance_fraction: f64,
    pub min_tolerance: f64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            tolerance_fraction: 0.10,
            min_tolerance: 1.0,
        }
    }
}

/// Satisfaction of one criterion for one (profile, requirement) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriterionEvaluation {
    pub criterion: Criterion,
    /// Whether the board configured a constraint for this criterion.
    /// Unconfigured criteria never penalize the score.
    pub configured: bool,
    /// Satisfaction in [0, 1]; 0.0 when unconfigured.
    pub satisfaction: f64,
}

/// Evaluate a profile against a board requirement
///
/// Returns one entry per criterion in `Criterion::ALL` order. Missing
/// profile attributes for a configured criterion evaluate to 0.0: absent
/// data cannot claim a match.
pub fn evaluate_profile(
    profile: &ProfileSnapshot,
    requirement: &BoardRequirement,
    config: &EvaluatorConfig,
) -> Vec<CriterionEvaluation> {
    Criterion::ALL
        .iter()
        .map(|&criterion| {
            let result = evaluate_criterion(criterion, profile, requirement, config);
            CriterionEvaluation {
                criterion,
                configured: result.is_some(),
                satisfaction: result.unwrap_or(0.0),
            }
        })
        .collect()
}

/// Evaluate one criterion; None means the board left it unconstrained.
fn evaluate_criterion(
    criterion: Criterion,
    profile: &ProfileSnapshot,
    requirement: &BoardRequirement,
    config: &EvaluatorConfig,
) -> Option<f64> {
    match criterion {
        Criterion::Age => range_satisfaction(
            profile.age.map(f64::from),
            requirement.min_age.map(f64::from),
            requirement.max_age.map(f64::from),
            config,
        ),
        Criterion::Height => range_satisfaction(
            profile.height_cm.map(f64::from),
            requirement.min_height_cm.map(f64::from),
            requirement.max_height_cm.map(f64::from),
            config,
        ),
        Criterion::Measurements => measurements_satisfaction(profile, requirement, config),
        Criterion::Gender => {
            single_value_satisfaction(profile.gender.as_deref(), &requirement.genders)
        }
        Criterion::BodyType => tag_set_satisfaction(&profile.body_types, &requirement.body_types),
        Criterion::Comfort => {
            tag_set_satisfaction(&profile.comfort_levels, &requirement.comfort_levels)
        }
        Criterion::Experience => single_value_satisfaction(
            profile.experience_level.as_deref(),
            &requirement.experience_levels,
        ),
        Criterion::Skills => tag_set_satisfaction(&profile.skills, &requirement.skills),
        Criterion::Location => {
            single_value_satisfaction(profile.city.as_deref(), &requirement.locations)
        }
        Criterion::SocialReach => requirement
            .min_social_reach
            .map(|threshold| social_reach_satisfaction(profile.follower_count, threshold)),
    }
}

/// Range criterion with linear falloff outside the bounds
///
/// Inside [min, max] (inclusive, missing bound = unconstrained side) the
/// satisfaction is 1.0; outside it decays linearly over the tolerance
/// window and bottoms out at 0.0.
fn range_satisfaction(
    value: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
    config: &EvaluatorConfig,
) -> Option<f64> {
    if min.is_none() && max.is_none() {
        return None;
    }

    let Some(value) = value else {
        return Some(0.0);
    };

    let distance = match (min, max) {
        (Some(min), _) if value < min => min - value,
        (_, Some(max)) if value > max => value - max,
        _ => return Some(1.0),
    };

    let tolerance = match (min, max) {
        (Some(min), Some(max)) if max > min => {
            (config.tolerance_fraction * (max - min)).max(config.min_tolerance)
        }
        _ => config.min_tolerance,
    };

    Some((1.0 - distance / tolerance).max(0.0))
}

/// Measurements family: mean of the configured bust/waist/hips sub-ranges.
fn measurements_satisfaction(
    profile: &ProfileSnapshot,
    requirement: &BoardRequirement,
    config: &EvaluatorConfig,
) -> Option<f64> {
    let sub_scores: Vec<f64> = [
        range_satisfaction(
            profile.bust_cm,
            requirement.min_bust_cm,
            requirement.max_bust_cm,
            config,
        ),
        range_satisfaction(
            profile.waist_cm,
            requirement.min_waist_cm,
            requirement.max_waist_cm,
            config,
        ),
        range_satisfaction(
            profile.hips_cm,
            requirement.min_hips_cm,
            requirement.max_hips_cm,
            config,
        ),
    ]
    .into_iter()
    .flatten()
    .collect();

    if sub_scores.is_empty() {
        return None;
    }

    Some(sub_scores.iter().sum::<f64>() / sub_scores.len() as f64)
}

/// Binary set membership for a single-valued profile attribute.
fn single_value_satisfaction(value: Option<&str>, required: &[String]) -> Option<f64> {
    if required.is_empty() {
        return None;
    }

    match value {
        Some(value) if required.iter().any(|r| r == value) => Some(1.0),
        _ => Some(0.0),
    }
}

/// Binary set membership for multi-valued profile tags
///
/// Nonempty intersection counts as a match; no partial credit.
fn tag_set_satisfaction(tags: &[String], required: &[String]) -> Option<f64> {
    if required.is_empty() {
        return None;
    }

    if tags.iter().any(|tag| required.contains(tag)) {
        Some(1.0)
    } else {
        Some(0.0)
    }
}

/// Social reach threshold with linear falloff down to half the threshold
///
/// At or above the threshold the satisfaction is 1.0; it decays linearly
/// and reaches 0.0 once the follower count drops to threshold / 2.
fn social_reach_satisfaction(follower_count: Option<u64>, threshold: u64) -> f64 {
    let Some(count) = follower_count else {
        return 0.0;
    };

    if count >= threshold {
        return 1.0;
    }

    let half = threshold as f64 / 2.0;
    ((count as f64 - half) / half).clamp(0.0, 1.0)
}
