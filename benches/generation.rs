//! Generation benchmarks
//!
//! Run with: cargo bench --bench generation

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use gapflight::entity::AgentBody;
use gapflight::policy::FeedForwardPolicy;
use gapflight::simulation::{AgentEntry, CollisionDetector, Headless, Session};
use gapflight::sprite::Silhouettes;
use gapflight::world::Obstacle;
use gapflight::SimConfig;

fn random_policies(count: usize) -> Vec<FeedForwardPolicy> {
    let mut rng = Xoshiro256StarStar::seed_from_u64(42);
    (0..count)
        .map(|_| FeedForwardPolicy::random(6, &mut rng))
        .collect()
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");
    let mut config = SimConfig::default();
    config.run.max_ticks = Some(1_000);

    for size in [10usize, 50, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut session = Session::new(config.clone()).unwrap();
                let mut policies = random_policies(size);
                let mut fitness = vec![0.0f32; size];
                let entries = policies
                    .iter_mut()
                    .zip(fitness.iter_mut())
                    .map(|(p, f)| AgentEntry::new(p, f));
                black_box(session.run_generation(entries, &mut Headless).unwrap())
            });
        });
    }
    group.finish();
}

fn bench_collision(c: &mut Criterion) {
    let silhouettes = Silhouettes::procedural();
    let detector = CollisionDetector::new(&silhouettes);
    let agent = AgentBody::new(230.0, 350.0);
    let near_miss = Obstacle::with_gap(250.0, 300, 200, silhouettes.segment_height(), 104.0);
    let hit = Obstacle::with_gap(250.0, 100, 200, silhouettes.segment_height(), 104.0);

    c.bench_function("collision_near_miss", |b| {
        b.iter(|| detector.collides(black_box(&agent), black_box(&near_miss)))
    });
    c.bench_function("collision_hit", |b| {
        b.iter(|| detector.collides(black_box(&agent), black_box(&hit)))
    });
}

criterion_group!(benches, bench_generation, bench_collision);
criterion_main!(benches);
