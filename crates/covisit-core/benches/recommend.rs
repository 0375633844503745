//! Benchmarks for the two ranking strategies.
//!
//! Measures the collaborative-filtering scan and the Monte-Carlo random
//! walk over synthetic bipartite graphs of increasing size, plus the
//! popularity fallback as a baseline.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use covisit_core::{EngineOptions, FixedClock, RecommendationEngine};

const NOW: i64 = 1_700_000_000;
const SECONDS_PER_DAY: i64 = 86_400;

/// Build a random bipartite graph with `n_users` users, `n_items` items
/// and roughly `avg_degree` interactions per user, timestamps spread over
/// the last year.
fn random_engine(n_users: i32, n_items: i32, avg_degree: usize, seed: u64) -> RecommendationEngine {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut engine = RecommendationEngine::with_options(EngineOptions {
        clock: Box::new(FixedClock(NOW)),
        ppr_seed: seed,
    });

    for user in 0..n_users {
        let degree = rng.gen_range(1..=avg_degree * 2);
        for _ in 0..degree {
            let item = rng.gen_range(0..n_items);
            let age_days = rng.gen_range(0..365);
            engine.add_interaction(user, item, NOW - age_days * SECONDS_PER_DAY);
        }
        if user % 3 == 0 {
            engine.set_item_category(user % n_items, user % 10);
        }
    }

    engine
}

fn bench_cf(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend_cf");
    for &n_users in &[1_000, 10_000] {
        let engine = random_engine(n_users, n_users / 2, 8, 42);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::from_parameter(n_users),
            &engine,
            |b, engine| {
                b.iter(|| engine.recommend_cf(0, 10, &[1, 2, 3]));
            },
        );
    }
    group.finish();
}

fn bench_ppr(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend_ppr");
    for &num_walks in &[1_000usize, 10_000] {
        let engine = random_engine(10_000, 5_000, 8, 42);
        group.throughput(Throughput::Elements(num_walks as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_walks),
            &num_walks,
            |b, &num_walks| {
                b.iter(|| engine.recommend_ppr(0, 10, num_walks, 4).unwrap());
            },
        );
    }
    group.finish();
}

fn bench_popular(c: &mut Criterion) {
    let engine = random_engine(10_000, 5_000, 8, 42);
    c.bench_function("recommend_popular", |b| {
        b.iter(|| engine.recommend_popular(10));
    });
}

criterion_group!(benches, bench_cf, bench_ppr, bench_popular);
criterion_main!(benches);
