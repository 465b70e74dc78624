//! Boardmatch - board matching and scoring service for the comp card
//! talent platform
//!
//! This library implements the scoring engine that matches talent
//! applications against agency-defined boards: per-criterion requirement
//! evaluation, weighted scoring with a structured breakdown, and batch
//! recompute over a board's applicant list.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{EvaluatorConfig, MatchEngine};
pub use models::{
    BoardConfig, BoardRequirement, BoardScoringWeights, Criterion, MatchBreakdown, MatchOutcome,
    ProfileSnapshot, ScoredApplication,
};
