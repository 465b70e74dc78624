// Core algorithm exports
pub mod evaluator;
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use evaluator::{evaluate_profile, CriterionEvaluation, EvaluatorConfig};
pub use filters::passes_prefilter;
pub use matcher::{BatchResult, MatchEngine};
pub use scoring::calculate_match_score;
