// Criterion benchmarks for the boardmatch scoring engine

use boardmatch::core::{evaluate_profile, EvaluatorConfig, MatchEngine};
use boardmatch::models::{
    Applicant, BoardConfig, BoardRequirement, BoardScoringWeights, ProfileSnapshot,
};
use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use uuid::Uuid;

fn create_profile(id: usize) -> ProfileSnapshot {
    ProfileSnapshot {
        profile_id: Uuid::new_v4(),
        age: Some(20 + (id % 12) as u8),
        height_cm: Some(165 + (id % 25) as u16),
        bust_cm: Some(82.0 + (id % 10) as f64),
        waist_cm: Some(58.0 + (id % 8) as f64),
        hips_cm: Some(86.0 + (id % 9) as f64),
        gender: Some("female".to_string()),
        body_types: vec!["slim".to_string()],
        comfort_levels: vec!["editorial".to_string()],
        experience_level: Some("professional".to_string()),
        skills: if id % 2 == 0 {
            vec!["runway".to_string()]
        } else {
            vec!["commercial".to_string()]
        },
        city: Some("Paris".to_string()),
        instagram_handle: None,
        follower_count: Some(1_000 * id as u64),
        is_active: true,
    }
}

fn create_board() -> BoardConfig {
    BoardConfig {
        requirement: BoardRequirement {
            min_age: Some(18),
            max_age: Some(30),
            min_height_cm: Some(172),
            max_height_cm: Some(182),
            min_waist_cm: Some(58.0),
            max_waist_cm: Some(64.0),
            genders: vec!["female".to_string()],
            skills: vec!["runway".to_string(), "editorial".to_string()],
            locations: vec!["Paris".to_string()],
            min_social_reach: Some(20_000),
            ..BoardRequirement::default()
        },
        weights: BoardScoringWeights::default(),
    }
}

fn bench_evaluate_profile(c: &mut Criterion) {
    let profile = create_profile(7);
    let board = create_board();
    let config = EvaluatorConfig::default();

    c.bench_function("evaluate_profile", |b| {
        b.iter(|| {
            evaluate_profile(
                black_box(&profile),
                black_box(&board.requirement),
                black_box(&config),
            )
        });
    });
}

fn bench_score_single(c: &mut Criterion) {
    let engine = MatchEngine::with_defaults();
    let profile = create_profile(7);
    let board = create_board();

    c.bench_function("score_single_pair", |b| {
        b.iter(|| engine.score(black_box(&profile), black_box(&board)));
    });
}

fn bench_score_batch(c: &mut Criterion) {
    let engine = MatchEngine::with_defaults();
    let board = create_board();

    let mut group = c.benchmark_group("score_batch");
    for size in [100, 1_000, 10_000] {
        let applicants: Vec<Applicant> = (0..size)
            .map(|i| Applicant {
                application_id: Uuid::new_v4(),
                profile: Some(create_profile(i)),
                created_at: Utc::now() - Duration::seconds(i as i64),
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &applicants, |b, a| {
            b.iter(|| engine.score_batch(black_box(&board), a.clone()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_evaluate_profile,
    bench_score_single,
    bench_score_batch
);
criterion_main!(benches);
